/// Password hashing and account password validation
///
/// Hashing uses Argon2id, the recommended algorithm for password storage
/// (winner of the Password Hashing Competition).
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// Validation is what account registration applies to a candidate password
/// before it is ever hashed: minimum length, not entirely numeric, not on
/// the common-password list, not too similar to the username. Every failed
/// check is reported, not just the first.
///
/// # Example
///
/// ```
/// use inkpost_shared::auth::password::{hash_password, verify_password, validate_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let password = "correct horse battery";
/// let hash = hash_password(password)?;
///
/// assert!(verify_password(password, &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
///
/// // Candidate passwords are checked against the username too
/// assert!(validate_password("correct horse battery", "alice").is_empty());
/// assert!(!validate_password("alice2024", "alice").is_empty());
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Minimum acceptable password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id with secure parameters
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
///
/// # Returns
///
/// PHC string format hash (includes algorithm, parameters, salt, and hash)
///
/// Example output:
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// # Arguments
///
/// * `password` - The plaintext password to verify
/// * `hash` - The password hash (PHC string format)
///
/// # Returns
///
/// `Ok(true)` if password matches, `Ok(false)` if it doesn't match
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` when the stored hash can't be
/// parsed, `PasswordError::VerifyError` on other verification failures.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the PHC string
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

/// Validates a candidate password for account creation
///
/// Runs every registered check and returns the message for each one that
/// failed, in a stable order. An empty vector means the password is
/// acceptable.
///
/// # Checks
///
/// 1. At least [`MIN_PASSWORD_LENGTH`] characters
/// 2. Not entirely numeric
/// 3. Not on the embedded common-password list (case-insensitive)
/// 4. Not too similar to the username
///
/// # Arguments
///
/// * `password` - The candidate password
/// * `username` - The username it will belong to (used by the similarity check)
///
/// # Example
///
/// ```
/// use inkpost_shared::auth::password::validate_password;
///
/// assert!(validate_password("plum-orchard-41", "alice").is_empty());
///
/// let errors = validate_password("12345678", "alice");
/// assert!(errors.iter().any(|e| e.contains("entirely numeric")));
/// assert!(errors.iter().any(|e| e.contains("too common")));
/// ```
pub fn validate_password(password: &str, username: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_LENGTH
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("This password is entirely numeric.".to_string());
    }

    if is_common_password(password) {
        errors.push("This password is too common.".to_string());
    }

    if is_similar_to_username(password, username) {
        errors.push("The password is too similar to the username.".to_string());
    }

    errors
}

/// Checks a password against the embedded common-password list
///
/// The comparison is case-insensitive. The list is a small excerpt of the
/// most frequently leaked passwords; it exists to reject the worst
/// offenders, not to be exhaustive.
pub fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.contains(&lowered.as_str())
}

/// Similarity check between a password and the username it belongs to
///
/// Flags the password when, case-insensitively, either value contains the
/// other. Usernames shorter than 3 characters are skipped since almost any
/// password would contain them by accident.
fn is_similar_to_username(password: &str, username: &str) -> bool {
    let username = username.trim().to_lowercase();
    if username.chars().count() < 3 {
        return false;
    }

    let password = password.to_lowercase();
    password.contains(&username) || username.contains(&password)
}

/// Most frequently seen leaked passwords, lowercase
///
/// Excerpted from published breach-corpus frequency tables.
const COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789", "12345", "1234", "111111", "1234567",
    "dragon", "123123", "baseball", "abc123", "football", "monkey", "letmein", "696969", "shadow",
    "master", "666666", "qwertyuiop", "123321", "mustang", "1234567890", "michael", "654321",
    "superman", "1qaz2wsx", "7777777", "121212", "000000", "qazwsx", "123qwe", "killer", "trustno1",
    "jordan", "jennifer", "zxcvbnm", "asdfgh", "hunter", "buster", "soccer", "harley", "batman",
    "andrew", "tigger", "sunshine", "iloveyou", "2000", "charlie", "robert", "thomas", "hockey",
    "ranger", "daniel", "starwars", "klaster", "112233", "george", "computer", "michelle",
    "jessica", "pepper", "1111", "zxcvbn", "555555", "11111111", "131313", "freedom", "777777",
    "pass", "maggie", "159753", "aaaaaa", "ginger", "princess", "joshua", "cheese", "amanda",
    "summer", "love", "ashley", "nicole", "chelsea", "biteme", "matthew", "access", "yankees",
    "987654321", "dallas", "austin", "thunder", "taylor", "matrix", "mobilemail", "mom", "monitor",
    "monitoring", "montana", "moon", "moscow", "password1", "password123", "welcome", "welcome1",
    "admin", "root", "toor", "letmein1", "qwerty123", "test", "testing", "changeme", "secret",
    "abcd1234", "passw0rd", "p@ssw0rd", "11223344", "87654321", "88888888", "default", "guest",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "test_password_123";
        let hash = hash_password(password).expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let password = "same_password";

        let hash1 = hash_password(password).expect("Hash 1 should succeed");
        let hash2 = hash_password(password).expect("Hash 2 should succeed");

        // Different salts = different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let password = "correct_password";
        let hash = hash_password(password).expect("Hash should succeed");

        let result = verify_password(password, &hash).expect("Verify should succeed");
        assert!(result, "Correct password should verify");
    }

    #[test]
    fn test_verify_password_incorrect() {
        let password = "correct_password";
        let hash = hash_password(password).expect("Hash should succeed");

        let result = verify_password("wrong_password", &hash).expect("Verify should succeed");
        assert!(!result, "Wrong password should not verify");
    }

    #[test]
    fn test_verify_password_empty() {
        let password = "password_xyz";
        let hash = hash_password(password).expect("Hash should succeed");

        let result = verify_password("", &hash).expect("Verify should succeed");
        assert!(!result, "Empty password should not verify");
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("password", "invalid_hash");
        assert!(result.is_err(), "Invalid hash should return error");
    }

    #[test]
    fn test_verify_password_malformed_hash() {
        let result = verify_password("password", "$argon2id$invalid");
        assert!(result.is_err(), "Malformed hash should return error");
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let passwords = vec![
            "simple-enough",
            "with spaces in it",
            "with-special-chars!@#$%",
            "unicode-密码-パスワード",
            "very_long_password_that_is_longer_than_usual_passwords_123456789",
        ];

        for password in passwords {
            let hash = hash_password(password).expect("Hash should succeed");
            let verified = verify_password(password, &hash).expect("Verify should succeed");
            assert!(verified, "Password '{}' should verify", password);
        }
    }

    #[test]
    fn test_validate_password_acceptable() {
        let acceptable = vec![
            "plum-orchard-41",
            "correct horse battery",
            "Tr4nsit-Lane",
            "winter maple 9 jars",
        ];

        for password in acceptable {
            let errors = validate_password(password, "alice");
            assert!(
                errors.is_empty(),
                "Password '{}' should be acceptable, got {:?}",
                password,
                errors
            );
        }
    }

    #[test]
    fn test_validate_password_too_short() {
        let errors = validate_password("plum-4", "alice");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least 8 characters"));
    }

    #[test]
    fn test_validate_password_entirely_numeric() {
        let errors = validate_password("905617283", "alice");
        assert!(errors.iter().any(|e| e.contains("entirely numeric")));
        // Long and uncommon, so only the numeric check fires
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_validate_password_common() {
        let errors = validate_password("letmein1", "alice");
        assert!(errors.iter().any(|e| e.contains("too common")));
    }

    #[test]
    fn test_validate_password_common_is_case_insensitive() {
        let errors = validate_password("PASSWORD123", "alice");
        assert!(errors.iter().any(|e| e.contains("too common")));
    }

    #[test]
    fn test_validate_password_similar_to_username() {
        let errors = validate_password("marguerite99", "marguerite");
        assert!(errors.iter().any(|e| e.contains("similar to the username")));
    }

    #[test]
    fn test_validate_password_username_contains_password() {
        // Containment in either direction counts
        let errors = validate_password("annamaria", "annamaria-v");
        assert!(errors.iter().any(|e| e.contains("similar to the username")));
    }

    #[test]
    fn test_validate_password_short_username_skips_similarity() {
        // Two-character usernames would match almost anything
        let errors = validate_password("canal-barge-7", "al");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_password_accumulates_all_failures() {
        // Short, numeric, and common at once
        let errors = validate_password("123456", "alice");
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("too short"));
        assert!(errors[1].contains("entirely numeric"));
        assert!(errors[2].contains("too common"));
    }

    #[test]
    fn test_validate_password_length_counts_chars_not_bytes() {
        // 8 multibyte characters should satisfy the length check
        let errors = validate_password("ひみつことばです!", "alice");
        assert!(errors.is_empty(), "got {:?}", errors);
    }
}
