//! Spiritual ID generation and verification
//!
//! An id looks like `OM-DHARMA-m2x4k1ab-9f86d081-37`:
//!
//! - a word drawn at random from a fixed vocabulary
//! - the creation time in Unix milliseconds, base 36
//! - an 8-hex-digit device fingerprint (SHA-256 of coarse device traits)
//! - a two-digit checksum over the three parts above
//!
//! The fingerprint is deliberately coarse. Two devices with the same screen,
//! timezone, language and client can share one; ids stay distinct through
//! the timestamp and word.

use std::future::Future;

use chrono::{Local, Offset, Utc};
use rand::seq::IndexedRandom;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

/// Leading segment of every id
pub const ID_PREFIX: &str = "OM";

/// Vocabulary for the word segment
pub const SPIRITUAL_WORDS: [&str; 24] = [
    "DHARMA", "KARMA", "SATTVA", "ATMAN", "BRAHMAN", "CHAKRA", "NIRVANA", "MANTRA", "SHANTI",
    "DEVA", "PRANA", "MOKSHA", "GURU", "SAMSARA", "AHIMSA", "SATYA", "YOGI", "BHAKTI", "BUDDHA",
    "JNANA", "MAYA", "SANGHA", "VEDANTA", "ANANDA",
];

/// Characters of the user agent that go into the fingerprint
const USER_AGENT_PREFIX_LEN: usize = 30;

/// Hex digits of the digest kept as the fingerprint
const FINGERPRINT_LEN: usize = 8;

/// Errors from id generation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdError {
    /// The digest primitive could not be used
    #[error("Digest unavailable: {0}")]
    Unavailable(String),
}

/// Source of SHA-256 digests
///
/// Awaiting the digest is the only suspension point of id generation.
pub trait Digester {
    fn sha256(&self, data: &[u8]) -> impl Future<Output = Result<Vec<u8>, IdError>> + Send;
}

/// Digester backed by the `sha2` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digester;

impl Digester for Sha256Digester {
    async fn sha256(&self, data: &[u8]) -> Result<Vec<u8>, IdError> {
        Ok(Sha256::digest(data).to_vec())
    }
}

/// Coarse, non-identifying device traits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// `WIDTHxHEIGHTxDEPTH`
    pub screen: String,
    /// Minutes behind UTC (UTC minus local time)
    pub timezone_offset: i32,
    /// BCP 47 language tag, e.g. `en-US`
    pub language: String,
    pub user_agent: String,
}

impl DeviceInfo {
    /// Collect traits of the current terminal session
    ///
    /// `language` overrides the tag derived from `$LANG`.
    pub fn detect(language: Option<&str>) -> Self {
        let columns = env_number("COLUMNS").unwrap_or(80);
        let lines = env_number("LINES").unwrap_or(24);
        let depth = match std::env::var("COLORTERM").as_deref() {
            Ok("truecolor") | Ok("24bit") => 24,
            _ => 8,
        };

        let local_minus_utc = Local::now().offset().fix().local_minus_utc();

        let language = language
            .map(str::to_string)
            .or_else(|| std::env::var("LANG").ok().and_then(|v| language_tag(&v)))
            .unwrap_or_else(|| "en-US".to_string());

        Self {
            screen: format!("{}x{}x{}", columns, lines, depth),
            timezone_offset: -(local_minus_utc / 60),
            language,
            user_agent: format!(
                "japa/{} ({}; {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
        }
    }

    /// The pipe-joined string that gets hashed
    pub fn fingerprint_source(&self) -> String {
        let user_agent: String = self.user_agent.chars().take(USER_AGENT_PREFIX_LEN).collect();
        format!(
            "{}|{}|{}|{}",
            self.screen, self.timezone_offset, self.language, user_agent
        )
    }
}

fn env_number(name: &str) -> Option<u32> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Turn a POSIX locale (`en_US.UTF-8`) into a language tag (`en-US`)
fn language_tag(locale: &str) -> Option<String> {
    let base = locale.split(['.', '@']).next()?.trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

/// Hash the device traits into an 8-hex-digit fingerprint
pub async fn device_fingerprint<D: Digester>(
    device: &DeviceInfo,
    digester: &D,
) -> Result<String, IdError> {
    let digest = digester.sha256(device.fingerprint_source().as_bytes()).await?;
    let hex = hex::encode(digest);
    hex.get(..FINGERPRINT_LEN)
        .map(str::to_string)
        .ok_or_else(|| IdError::Unavailable(format!("digest too short ({} hex digits)", hex.len())))
}

/// Sum of UTF-16 code units modulo 100, zero-padded to two digits
pub fn checksum(input: &str) -> String {
    let sum: u64 = input.encode_utf16().map(u64::from).sum();
    format!("{:02}", sum % 100)
}

/// Render a number in lowercase base 36
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Assemble a checksummed id from its parts
pub fn compose_id(word: &str, timestamp_ms: u64, fingerprint: &str) -> String {
    let base = format!("{}-{}-{}", word, to_base36(timestamp_ms), fingerprint);
    let checksum = checksum(&base);
    format!("{}-{}-{}", ID_PREFIX, base, checksum)
}

/// Mint a new spiritual id for this device
pub async fn generate_spiritual_id<D: Digester>(
    device: &DeviceInfo,
    digester: &D,
) -> Result<String, IdError> {
    let timestamp_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let word = SPIRITUAL_WORDS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(SPIRITUAL_WORDS[0]);

    let fingerprint = device_fingerprint(device, digester).await?;
    let id = compose_id(word, timestamp_ms, &fingerprint);
    debug!("Generated id {}", id);
    Ok(id)
}

/// Check the prefix, shape and checksum of an id
///
/// Never panics; malformed input is simply invalid.
pub fn verify_id(id: &str) -> bool {
    if !id.starts_with("OM-") {
        return false;
    }

    let parts: Vec<&str> = id.split('-').collect();
    if parts.len() < 5 {
        return false;
    }

    let Some((expected, rest)) = parts.split_last() else {
        return false;
    };
    let base = rest[1..].join("-");
    checksum(&base) == *expected
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnavailableDigester;

    impl Digester for UnavailableDigester {
        async fn sha256(&self, _data: &[u8]) -> Result<Vec<u8>, IdError> {
            Err(IdError::Unavailable("no crypto provider".to_string()))
        }
    }

    fn device() -> DeviceInfo {
        DeviceInfo {
            screen: "1920x1080x24".to_string(),
            timezone_offset: -330,
            language: "hi-IN".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generated_ids_verify() {
        for _ in 0..50 {
            let id = generate_spiritual_id(&device(), &Sha256Digester).await.unwrap();
            assert!(verify_id(&id), "generated id failed verification: {}", id);
            assert!(id.starts_with("OM-"));
            assert_eq!(id.split('-').count(), 5);
        }
    }

    #[tokio::test]
    async fn test_word_comes_from_vocabulary() {
        let id = generate_spiritual_id(&device(), &Sha256Digester).await.unwrap();
        let word = id.split('-').nth(1).unwrap();
        assert!(SPIRITUAL_WORDS.contains(&word));
    }

    #[tokio::test]
    async fn test_fingerprint_is_stable_and_short() {
        let a = device_fingerprint(&device(), &Sha256Digester).await.unwrap();
        let b = device_fingerprint(&device(), &Sha256Digester).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));

        let mut other = device();
        other.timezone_offset = 0;
        let c = device_fingerprint(&other, &Sha256Digester).await.unwrap();
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_fingerprint_matches_sha256_prefix() {
        let source = device().fingerprint_source();
        let expected = &hex::encode(Sha256::digest(source.as_bytes()))[..8];
        let fp = device_fingerprint(&device(), &Sha256Digester).await.unwrap();
        assert_eq!(fp, expected);
    }

    #[tokio::test]
    async fn test_unavailable_digest_fails_generation() {
        let result = generate_spiritual_id(&device(), &UnavailableDigester).await;
        assert!(matches!(result, Err(IdError::Unavailable(_))));
    }

    #[test]
    fn test_fingerprint_source_truncates_user_agent() {
        let source = device().fingerprint_source();
        assert_eq!(
            source,
            "1920x1080x24|-330|hi-IN|Mozilla/5.0 (X11; Linux x86_64"
        );
    }

    #[test]
    fn test_checksum() {
        // 'A' = 65, 'B' = 66
        assert_eq!(checksum("AB"), "31");
        assert_eq!(checksum(""), "00");
        // 'd' = 100
        assert_eq!(checksum("d"), "00");
        assert_eq!(checksum("\u{5}"), "05");
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_compose_id_shape() {
        let id = compose_id("MANTRA", 36, "deadbeef");
        let expected_checksum = checksum("MANTRA-10-deadbeef");
        assert_eq!(id, format!("OM-MANTRA-10-deadbeef-{}", expected_checksum));
        assert!(verify_id(&id));
    }

    #[test]
    fn test_verify_rejects_bad_prefix() {
        let id = compose_id("GURU", 1_000, "01234567");
        let swapped = id.replacen("OM-", "AUM-", 1);
        assert!(!verify_id(&swapped));
        assert!(!verify_id(""));
        assert!(!verify_id("om-GURU-rs-01234567-00"));
    }

    #[test]
    fn test_verify_rejects_too_few_segments() {
        assert!(!verify_id("OM-GURU-rs-00"));
        assert!(!verify_id("OM-"));
        assert!(!verify_id("OM"));
    }

    #[test]
    fn test_verify_rejects_tampered_checksum() {
        let id = compose_id("YOGI", 123_456_789, "cafebabe");
        let (body, sum) = id.rsplit_once('-').unwrap();
        let bumped: u32 = (sum.parse::<u32>().unwrap() + 1) % 100;
        let tampered = format!("{}-{:02}", body, bumped);
        assert!(!verify_id(&tampered));

        let tampered_body = id.replacen("YOGI", "YOGA", 1);
        assert!(!verify_id(&tampered_body));
    }

    #[test]
    fn test_verify_accepts_extra_segments() {
        // Checksum covers everything between prefix and checksum
        let base = "DEVA-x-y-z";
        let id = format!("OM-{}-{}", base, checksum(base));
        assert!(verify_id(&id));
    }

    #[test]
    fn test_language_tag() {
        assert_eq!(language_tag("en_US.UTF-8").as_deref(), Some("en-US"));
        assert_eq!(language_tag("de_DE@euro").as_deref(), Some("de-DE"));
        assert_eq!(language_tag("C"), None);
        assert_eq!(language_tag(""), None);
    }

    #[test]
    fn test_detect_uses_language_override() {
        let info = DeviceInfo::detect(Some("sa-IN"));
        assert_eq!(info.language, "sa-IN");
        assert!(info.user_agent.starts_with("japa/"));
        assert_eq!(info.screen.split('x').count(), 3);
    }
}
