use uuid::Uuid;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SALT_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const MEETING_CODE_LEN: usize = 6;
pub const SALT_LEN: usize = 11;

/// Six characters from `A-Z0-9`, assigned when a meeting is created.
pub fn meeting_code() -> String {
    from_charset(CODE_CHARSET, MEETING_CODE_LEN)
}

/// Eleven lowercase base-36 characters for password salting.
pub fn salt() -> String {
    from_charset(SALT_CHARSET, SALT_LEN)
}

/// Uniform draw from `charset` using v4 UUID bytes as entropy. Bytes 6
/// and 8 carry the version and variant bits and are skipped; values past
/// the largest multiple of `charset.len()` are rejected so the modulo
/// does not bias the low characters.
fn from_charset(charset: &[u8], len: usize) -> String {
    let limit = 256 - (256 % charset.len());
    let mut out = String::with_capacity(len);
    while out.len() < len {
        let bytes = Uuid::new_v4().into_bytes();
        for (i, byte) in bytes.iter().enumerate() {
            if i == 6 || i == 8 {
                continue;
            }
            if (*byte as usize) < limit {
                out.push(charset[*byte as usize % charset.len()] as char);
                if out.len() == len {
                    break;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_code_shape() {
        let code = meeting_code();
        assert_eq!(code.len(), MEETING_CODE_LEN);
        assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn salt_shape() {
        let s = salt();
        assert_eq!(s.len(), SALT_LEN);
        assert!(s.bytes().all(|b| SALT_CHARSET.contains(&b)));
    }

    #[test]
    fn codes_vary() {
        let a = meeting_code();
        let b = meeting_code();
        let c = meeting_code();
        assert!(a != b || b != c);
    }
}
