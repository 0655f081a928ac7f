use sha2::{Digest, Sha256};
use std::fmt;

/// Deterministic key over an operation name and its semantic inputs.
///
/// Every field is length-prefixed before hashing so that `("ab", "c")` and
/// `("a", "bc")` encode differently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: String,
    digest: String,
}

impl CacheKey {
    pub fn new<I, S>(operation: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = Sha256::new();
        write_field(&mut hasher, operation);
        for part in parts {
            write_field(&mut hasher, part.as_ref());
        }

        Self {
            operation: sanitize(operation),
            digest: hex::encode(hasher.finalize()),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// `{operation}_{sha256}.json`
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.operation, self.digest)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation, self.digest)
    }
}

fn write_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

// Operation names end up in file names
fn sanitize(operation: &str) -> String {
    let cleaned: String = operation
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "entry".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_input_same_key() {
        let a = CacheKey::new("search", ["CS577"]);
        let b = CacheKey::new("search", ["CS577"]);
        assert_eq!(a, b);
        assert_eq!(a.file_name(), b.file_name());
    }

    #[test]
    fn test_operation_is_part_of_key() {
        let a = CacheKey::new("search", ["CS577"]);
        let b = CacheKey::new("summary", ["CS577"]);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_field_boundaries_matter() {
        let a = CacheKey::new("completion", ["ab", "c"]);
        let b = CacheKey::new("completion", ["a", "bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_no_collisions_over_sample() {
        let mut seen = HashSet::new();
        for dept in ["CS", "MATH", "ECE", "STAT"] {
            for num in 100..160 {
                let key = CacheKey::new("search", [format!("{}{}", dept, num)]);
                assert!(seen.insert(key.digest().to_string()));
            }
        }
        assert_eq!(seen.len(), 240);
    }

    #[test]
    fn test_file_name_shape() {
        let key = CacheKey::new("post summary/../x", ["u"]);
        let name = key.file_name();
        assert!(name.starts_with("post_summary____x_"));
        assert!(name.ends_with(".json"));
        assert_eq!(key.digest().len(), 64);
    }
}
