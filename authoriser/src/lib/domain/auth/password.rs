use rand::Rng;
use serde::Deserialize;

/// Characters a generated one-time password may contain.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&*+-=?@_";

/// Length of a generated one-time password.
pub const DEFAULT_LENGTH: usize = 12;

/// Policy for one-time password generation (forgot-password flow).
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordPolicy {
    pub length: usize,
    pub alphabet: String,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            alphabet: DEFAULT_ALPHABET.to_string(),
        }
    }
}

/// Generate a one-time password under the given policy.
///
/// Draws one uniformly-random character at a time from the policy alphabet.
///
/// # Arguments
/// * `policy` - Length and alphabet to draw from
/// * `rng` - Randomness source
///
/// # Returns
/// Generated password of `policy.length` characters
pub fn generate(policy: &PasswordPolicy, rng: &mut impl Rng) -> String {
    let alphabet: Vec<char> = policy.alphabet.chars().collect();
    (0..policy.length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

/// Generate a one-time password under the given policy with the thread RNG.
pub fn generate_default(policy: &PasswordPolicy) -> String {
    generate(policy, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_generated_password_respects_policy() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(7);

        let password = generate(&policy, &mut rng);
        assert_eq!(password.chars().count(), DEFAULT_LENGTH);
        assert!(password.chars().all(|c| DEFAULT_ALPHABET.contains(c)));
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let policy = PasswordPolicy::default();
        let a = generate(&policy, &mut StdRng::seed_from_u64(42));
        let b = generate(&policy, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_alphabet_is_honoured() {
        let policy = PasswordPolicy {
            length: 32,
            alphabet: "ab".to_string(),
        };
        let password = generate(&policy, &mut rand::thread_rng());
        assert_eq!(password.len(), 32);
        assert!(password.chars().all(|c| c == 'a' || c == 'b'));
    }
}
