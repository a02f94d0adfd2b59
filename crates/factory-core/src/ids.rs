//! Identifier generators for compiled documents.

use std::collections::HashSet;

use uuid::Uuid;

use crate::traits::IdGenerator;

/// Length of every generated token. Eight base-36 digits carry ~41 bits.
pub const TOKEN_LEN: usize = 8;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render the low digits of `n` in lowercase base 36, zero-padded to `width`.
fn base36(mut n: u128, width: usize) -> String {
    let mut digits = vec![b'0'; width];
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(n % 36) as usize];
        n /= 36;
    }
    digits.into_iter().map(char::from).collect()
}

/// Random identifiers backed by uuid v4.
///
/// Remembers every token it has issued and redraws on the rare collision,
/// so tokens are unique within one instance. Create one per compilation.
#[derive(Debug, Default)]
pub struct RandomIds {
    issued: HashSet<String>,
}

impl RandomIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for RandomIds {
    fn token(&mut self) -> String {
        loop {
            let token = base36(Uuid::new_v4().as_u128(), TOKEN_LEN);
            if self.issued.insert(token.clone()) {
                return token;
            }
        }
    }

    fn uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic identifiers from a shared counter.
///
/// Two compilations of the same spec with fresh `SequentialIds` produce
/// byte-identical documents.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

impl IdGenerator for SequentialIds {
    fn token(&mut self) -> String {
        base36(u128::from(self.advance()), TOKEN_LEN)
    }

    fn uuid(&mut self) -> Uuid {
        Uuid::from_u128(u128::from(self.advance()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn base36_pads_and_encodes() {
        assert_eq!(base36(0, 4), "0000");
        assert_eq!(base36(35, 4), "000z");
        assert_eq!(base36(36, 4), "0010");
    }

    #[test]
    fn random_tokens_are_short_alphanumeric() {
        let mut ids = RandomIds::new();
        let token = ids.token();

        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn random_tokens_do_not_repeat() {
        let mut ids = RandomIds::new();
        let tokens: HashSet<String> = (0..5_000).map(|_| ids.token()).collect();
        assert_eq!(tokens.len(), 5_000);
    }

    #[test]
    fn sequential_ids_are_deterministic() {
        let mut a = SequentialIds::new();
        let mut b = SequentialIds::new();

        assert_eq!(a.uuid(), b.uuid());
        assert_eq!(a.token(), b.token());
        assert_eq!(a.token(), "00000003");
    }
}
