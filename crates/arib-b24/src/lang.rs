//! 字幕管理データで使用される言語コード。

use std::fmt;

/// ISO 639-2で規定される3文字の言語コード。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LangCode(pub [u8; 3]);

// ARIB TR-B14より。
impl LangCode {
    /// 日本語。
    pub const JPN: LangCode = LangCode(*b"jpn");
    /// 英語。
    pub const ENG: LangCode = LangCode(*b"eng");
    /// ドイツ語。
    pub const DEU: LangCode = LangCode(*b"deu");
    /// フランス語。
    pub const FRA: LangCode = LangCode(*b"fra");
    /// ポルトガル語。
    pub const POR: LangCode = LangCode(*b"por");
    /// 中国語。
    pub const ZHO: LangCode = LangCode(*b"zho");
    /// 韓国語。
    pub const KOR: LangCode = LangCode(*b"kor");
    /// スペイン語。
    pub const SPA: LangCode = LangCode(*b"spa");
    /// 外国語。
    pub const ETC: LangCode = LangCode(*b"etc");

    /// 言語コードが英小文字のみで構成されていれば文字列として返す。
    pub fn as_str(&self) -> Option<&str> {
        if self.0.iter().all(u8::is_ascii_lowercase) {
            std::str::from_utf8(&self.0).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0.escape_ascii(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_code() {
        assert_eq!(LangCode::JPN.as_str(), Some("jpn"));
        assert_eq!(LangCode([0xFF, b'a', b'b']).as_str(), None);
        assert_eq!(LangCode::ENG.to_string(), "eng");
        assert_eq!(LangCode([0xFF, b'a', b'b']).to_string(), "\\xffab");
    }
}
