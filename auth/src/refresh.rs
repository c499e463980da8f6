use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;

/// Random bytes per refresh token before hex encoding (64 bytes = 128 hex chars).
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Generate an opaque refresh token.
///
/// Refresh tokens are plain random strings drawn from the OS CSPRNG. They carry
/// no claims and cannot be decoded; the server-side session record is the only
/// thing that gives them meaning.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
