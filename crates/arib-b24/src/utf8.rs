//! ARIB STD-B24で規定されるUCS（UTF-8）符号のトークン化。
//!
//! 符号集合の切り替えはなく、文字は書記素クラスタ単位で[`Token::Character`]となる。
//! C1制御符号は`0xC2`に続く`0x80..=0x9F`で表される。

use unicode_segmentation::UnicodeSegmentation;

use crate::control::{self, ByteSource, Eof};
use crate::error::TokenizeError;
use crate::token::Token;

/// 制御符号のパラメータを読み込むためのカーソル。
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl ByteSource for Cursor<'_> {
    #[inline]
    fn read_byte(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }
}

/// `pos`の位置から制御符号が始まっていれば`true`を返す。
#[inline]
fn is_control_at(bytes: &[u8], pos: usize) -> bool {
    match bytes[pos..] {
        [0x00..=0x20 | control::DEL, ..] => true,
        [control::C1_LEAD, 0x80..=0x9F, ..] => true,
        _ => false,
    }
}

/// UTF-8符号の符号列`bytes`をトークンに分解する。
///
/// SS2・SS3・LS0・LS1・ESCはこの符号化方式では現れないため、
/// [`TokenizeError::Unreachable`]として扱う。
pub fn tokenize(bytes: &[u8]) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor { bytes, pos: 0 };

    while cursor.pos < bytes.len() {
        let offset = cursor.pos;
        let r = match bytes[offset..] {
            [code @ (control::SS2 | control::SS3 | control::LS0 | control::LS1 | control::ESC), ..] => {
                return Err(TokenizeError::Unreachable { code, offset });
            }
            [code @ (0x00..=0x20 | control::DEL), ..] => {
                cursor.pos += 1;
                control::read_c0(&mut cursor, code)
            }
            [control::C1_LEAD, control::MACRO, ..] => {
                // マクロは使わないため、定義を終端のMACRO 0x4Fまで読み飛ばす
                log::trace!("unsupported MACRO");
                let rest = &bytes[offset + 2..];
                let end = match rest {
                    [0x4F, ..] => 1,
                    _ => {
                        let Some(pos) = rest
                            .windows(3)
                            .position(|w| *w == [control::C1_LEAD, control::MACRO, 0x4F])
                        else {
                            return Err(TokenizeError::Truncated { offset });
                        };
                        pos + 3
                    }
                };
                cursor.pos = offset + 2 + end;
                Ok(None)
            }
            [control::C1_LEAD, code @ 0x80..=0x9F, ..] => {
                cursor.pos += 2;
                control::read_c1(&mut cursor, code)
            }
            _ => {
                let len = (offset + 1..bytes.len())
                    .find(|&pos| is_control_at(bytes, pos))
                    .unwrap_or(bytes.len())
                    - offset;
                let text = match std::str::from_utf8(&bytes[offset..][..len]) {
                    Ok(text) => text,
                    Err(e) if e.error_len().is_none() => {
                        return Err(TokenizeError::Truncated {
                            offset: offset + e.valid_up_to(),
                        });
                    }
                    Err(e) => {
                        return Err(TokenizeError::UnexpectedFormat {
                            offset: offset + e.valid_up_to(),
                        });
                    }
                };
                tokens.extend(text.graphemes(true).map(Token::character));
                cursor.pos += len;
                continue;
            }
        };

        match r {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => {}
            Err(Eof) => return Err(TokenizeError::Truncated { offset }),
        }
    }

    Ok(tokens)
}
