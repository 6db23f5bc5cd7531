//! 符号の復号・符号化で発生するエラー。

use thiserror::Error;

/// トークン化で発生するエラー。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// 制御符号や2バイト符号の途中で符号列が終了した。
    ///
    /// `offset`は途中で終了した符号の先頭位置である。
    #[error("truncated code at offset {offset}")]
    Truncated {
        /// 符号列中の位置。
        offset: usize,
    },

    /// 符号化方式上現れるはずのない制御符号が現れた。
    #[error("unreachable control code {code:#04X} at offset {offset}")]
    Unreachable {
        /// 制御符号。
        code: u8,
        /// 符号列中の位置。
        offset: usize,
    },

    /// 符号列の形式が不正である。
    #[error("unexpected format at offset {offset}")]
    UnexpectedFormat {
        /// 符号列中の位置。
        offset: usize,
    },
}

/// 符号化で発生するエラー。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// パラメータの値が符号化できる範囲を超えている。
    #[error("{name} is out of range: {value} > {max}")]
    OutOfRange {
        /// パラメータ名。
        name: &'static str,
        /// 値。
        value: u64,
        /// 最大値。
        max: u64,
    },

    /// 文字に制御文字が含まれている。
    #[error("control character in a grapheme")]
    ControlInCharacter,

    /// DRCSは符号化できない。
    #[error("DRCS cannot be encoded")]
    Drcs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            TokenizeError::Unreachable {
                code: 0x1B,
                offset: 3
            }
            .to_string(),
            "unreachable control code 0x1B at offset 3",
        );
        assert_eq!(
            EncodeError::OutOfRange {
                name: "x",
                value: 64,
                max: 63
            }
            .to_string(),
            "x is out of range: 64 > 63",
        );
    }
}
