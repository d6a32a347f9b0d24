// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "memory://";

// Route segments, all API routes live under /api/v1
pub const API_PATH: &str = "api";
pub const API_VERSION: &str = "v1";

// Token configuration constants
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const MIN_SECRET_BYTES: usize = 32;

// Password hashing cost (Argon2id, OWASP baseline)
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;

// Input bounds
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_PASSWORD_LEN: usize = 1024;
pub const MAX_TOKEN_LEN: usize = 4096;
