//! Random session ids and connection tokens.

use rand::Rng;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a session id.
pub const SESSION_ID_LEN: usize = 8;
/// Length of a connection token.
pub const TOKEN_LEN: usize = 32;

fn random_string(rng: &mut impl Rng, charset: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| char::from(charset[rng.random_range(0..charset.len())]))
        .collect()
}

/// Eight upper-case alphanumerics, short enough to read out loud.
pub fn session_id(rng: &mut impl Rng) -> String {
    random_string(rng, ID_CHARSET, SESSION_ID_LEN)
}

/// Opaque secret handed to one seat for later rejoins and moves.
pub fn connection_token(rng: &mut impl Rng) -> String {
    random_string(rng, TOKEN_CHARSET, TOKEN_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_session_id_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = session_id(&mut rng);
        assert_eq!(id.len(), SESSION_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_tokens_differ() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = connection_token(&mut rng);
        let b = connection_token(&mut rng);
        assert_eq!(a.len(), TOKEN_LEN);
        assert_ne!(a, b);
    }
}
