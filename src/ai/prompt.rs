//! Fixed texts the assistant speaks with. The UI is Indonesian so
//! these are too.

/// System turn prepended to every completion request. Never stored in
/// a conversation.
pub const SYSTEM_PERSONA: &str = "Kamu adalah Angelina Bot, asisten AI yang ramah, ceria, dan suka membantu. Jawab pertanyaan dengan gaya yang friendly dan menggunakan emoji sesekali untuk membuat percakapan lebih hidup! ✨";

/// Substituted when the remote reply decodes but has no content.
pub const EMPTY_REPLY: &str = "Maaf, tidak ada respons.";

/// Appended as an assistant turn whenever a reply could not be fetched.
pub const APOLOGY: &str = "Maaf, terjadi kesalahan. Silakan coba lagi.";

// Error payloads returned by the relay endpoint
pub const MISSING_API_KEY: &str = "API key tidak ditemukan";
pub const SERVICE_FAILED: &str = "Gagal mendapatkan respons dari AI";
pub const SERVER_FAILED: &str = "Terjadi kesalahan pada server";
