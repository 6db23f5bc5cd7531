//! トークンをUTF-8符号の符号列に変換する。
//!
//! [`crate::utf8::tokenize`]の逆変換であり、C1制御符号は`0xC2`に続けて出力される。

use smallvec::SmallVec;

use crate::control;
use crate::error::EncodeError;
use crate::token::{
    ConcealmentMode, FlashingMode, Ornament, PatternPolarity, SizeControl, Token, WritingMode,
};

/// 1トークン分の符号列。
pub type Encoded = SmallVec<[u8; 16]>;

#[inline]
fn check(name: &'static str, value: u8, max: u8) -> Result<u8, EncodeError> {
    if value > max {
        Err(EncodeError::OutOfRange {
            name,
            value: value as u64,
            max: max as u64,
        })
    } else {
        Ok(value)
    }
}

#[inline]
fn c1(buf: &mut Encoded, code: u8) {
    buf.extend_from_slice(&[control::C1_LEAD, code]);
}

/// CSIのパラメータと中間文字、終端文字を書き込む。
fn csi(buf: &mut Encoded, params: &[u32], f: u8) {
    c1(buf, control::CSI);
    for (i, p) in params.iter().enumerate() {
        if i != 0 {
            buf.push(b';');
        }
        buf.extend_from_slice(p.to_string().as_bytes());
    }
    buf.extend_from_slice(&[0x20, f]);
}

/// ORNの`P2`として、カラーマップアドレスを`パレット番号×100＋色番号`に変換する。
#[inline]
fn ornament_color(index: u8) -> u32 {
    (index >> 4) as u32 * 100 + (index & 0x0F) as u32
}

/// TIMEの時刻指定を書き込む。
fn time(buf: &mut Encoded, name: &'static str, ms: u64, f: u8) -> Result<(), EncodeError> {
    let hour = ms / (60 * 60 * 1000);
    let Ok(hour) = u32::try_from(hour) else {
        return Err(EncodeError::OutOfRange {
            name,
            value: ms,
            max: u32::MAX as u64 * (60 * 60 * 1000) + (60 * 60 * 1000 - 1),
        });
    };
    let minute = (ms / (60 * 1000) % 60) as u32;
    let second = (ms / 1000 % 60) as u32;
    let milli = (ms % 1000) as u32;

    c1(buf, control::TIME);
    buf.push(0x29);
    for (i, p) in [hour, minute, second, milli].into_iter().enumerate() {
        if i != 0 {
            buf.push(b';');
        }
        buf.extend_from_slice(p.to_string().as_bytes());
    }
    buf.extend_from_slice(&[0x20, f]);
    Ok(())
}

/// 符号列で制御符号として扱われる文字であれば`true`を返す。
#[inline]
fn is_control(c: char) -> bool {
    matches!(c, '\0'..=' ' | '\x7F'..='\u{9F}')
}

/// トークンを符号列に変換する。
///
/// [`Token::Character`]は書記素クラスタを構成するコードポイントのUTF-8表現を連結したものになる。
/// DRCSを置換した文字も同様に扱われる。
/// [`Token::Drcs`]は符号化できないため[`EncodeError::Drcs`]を返す。
pub fn encode_token(token: &Token) -> Result<Encoded, EncodeError> {
    let mut buf = Encoded::new();
    match *token {
        Token::Character(ref c) => {
            if c.grapheme.chars().any(is_control) {
                return Err(EncodeError::ControlInCharacter);
            }
            buf.extend_from_slice(c.grapheme.as_bytes());
        }
        Token::Drcs(_) => return Err(EncodeError::Drcs),
        Token::Space => buf.push(control::SP),
        Token::Delete => buf.push(control::DEL),

        Token::ActivePositionBackward => buf.push(control::APB),
        Token::ActivePositionForward => buf.push(control::APF),
        Token::ActivePositionDown => buf.push(control::APD),
        Token::ActivePositionUp => buf.push(control::APU),
        Token::ActivePositionReturn => buf.push(control::APR),
        Token::ParameterizedActivePositionForward(n) => {
            buf.extend_from_slice(&[control::PAPF, 0x40 | check("PAPF", n, 63)?]);
        }
        Token::ActivePositionSet(x, y) => {
            let x = check("APS column", x, 63)?;
            let y = check("APS row", y, 63)?;
            buf.extend_from_slice(&[control::APS, 0x40 | y, 0x40 | x]);
        }
        Token::ClearScreen => buf.push(control::CS),

        Token::BlackForeground => c1(&mut buf, control::BKF),
        Token::RedForeground => c1(&mut buf, control::BKF + 1),
        Token::GreenForeground => c1(&mut buf, control::BKF + 2),
        Token::YellowForeground => c1(&mut buf, control::BKF + 3),
        Token::BlueForeground => c1(&mut buf, control::BKF + 4),
        Token::MagentaForeground => c1(&mut buf, control::BKF + 5),
        Token::CyanForeground => c1(&mut buf, control::BKF + 6),
        Token::WhiteForeground => c1(&mut buf, control::BKF + 7),

        Token::ColorControlForeground(n) => {
            c1(&mut buf, control::COL);
            buf.push(0x40 | check("COL", n, 15)?);
        }
        Token::ColorControlBackground(n) => {
            c1(&mut buf, control::COL);
            buf.push(0x50 | check("COL", n, 15)?);
        }
        Token::ColorControlHalfForeground(n) => {
            c1(&mut buf, control::COL);
            buf.push(0x60 | check("COL", n, 15)?);
        }
        Token::ColorControlHalfBackground(n) => {
            c1(&mut buf, control::COL);
            buf.push(0x70 | check("COL", n, 15)?);
        }
        Token::PalletControl(n) => {
            c1(&mut buf, control::COL);
            buf.extend_from_slice(&[0x20, 0x40 | check("COL pallet", n, 15)?]);
        }

        Token::SmallSize => c1(&mut buf, control::SSZ),
        Token::MiddleSize => c1(&mut buf, control::MSZ),
        Token::NormalSize => c1(&mut buf, control::NSZ),
        Token::CharacterSizeControl(sz) => {
            c1(&mut buf, control::SZX);
            buf.push(match sz {
                SizeControl::Tiny => 0x60,
                SizeControl::DoubleHeight => 0x41,
                SizeControl::DoubleWidth => 0x44,
                SizeControl::DoubleSize => 0x45,
                SizeControl::Special1 => 0x6B,
                SizeControl::Special2 => 0x64,
            });
        }

        Token::FlashingControl(mode) => {
            c1(&mut buf, control::FLC);
            buf.push(match mode {
                FlashingMode::Normal => 0x40,
                FlashingMode::Inverted => 0x47,
                FlashingMode::Stop => 0x4F,
            });
        }
        Token::ConcealmentControl(mode) => {
            c1(&mut buf, control::CDC);
            match mode {
                ConcealmentMode::Start => buf.push(0x40),
                ConcealmentMode::Replacing(n) => {
                    buf.extend_from_slice(&[0x20, 0x40 | check("CDC", n, 15)?]);
                }
                ConcealmentMode::Stop => buf.push(0x4F),
            }
        }
        Token::PatternPolarityControl(polarity) => {
            c1(&mut buf, control::POL);
            buf.push(match polarity {
                PatternPolarity::Normal => 0x40,
                PatternPolarity::Inverted1 => 0x41,
                PatternPolarity::Inverted2 => 0x42,
            });
        }
        Token::WritingModeModification(mode) => {
            c1(&mut buf, control::WMM);
            buf.push(match mode {
                WritingMode::Both => 0x40,
                WritingMode::Foreground => 0x44,
                WritingMode::Background => 0x45,
            });
        }
        Token::HilightingCharacterBlock(n) => {
            c1(&mut buf, control::HLC);
            buf.push(0x40 | check("HLC", n, 15)?);
        }
        Token::RepeatCharacter(n) => {
            c1(&mut buf, control::RPC);
            buf.push(0x40 | check("RPC", n, 63)?);
        }
        Token::StartLining => c1(&mut buf, control::STL),
        Token::StopLining => c1(&mut buf, control::SPL),

        Token::TimeControlWait(n) => {
            c1(&mut buf, control::TIME);
            buf.extend_from_slice(&[0x20, 0x40 | check("TIME wait", n, 63)?]);
        }
        Token::TimeControlMode(mode) => {
            c1(&mut buf, control::TIME);
            buf.extend_from_slice(&[0x28, 0x40 | mode.bits()]);
        }
        Token::TimeControlPresentationStart(ms) => time(&mut buf, "TIME", ms, 0x40)?,
        Token::TimeControlOffset(ms) => time(&mut buf, "TIME", ms, 0x41)?,

        Token::SetWritingFormat(n) => {
            csi(&mut buf, &[check("SWF", n, 12)? as u32], control::CSI_SWF);
        }
        Token::SetDisplayFormat(w, h) => csi(&mut buf, &[w, h], control::CSI_SDF),
        Token::SetDisplayPosition(x, y) => csi(&mut buf, &[x, y], control::CSI_SDP),
        Token::CharacterCompositionDotDesignation(w, h) => {
            csi(&mut buf, &[w, h], control::CSI_SSM);
        }
        Token::SetHorizontalSpacing(n) => csi(&mut buf, &[n], control::CSI_SHS),
        Token::SetVerticalSpacing(n) => csi(&mut buf, &[n], control::CSI_SVS),
        Token::ActiveCoordinatePositionSet(x, y) => csi(&mut buf, &[x, y], control::CSI_ACPS),
        Token::RasterColourCommand(n) => {
            csi(&mut buf, &[check("RCS", n, 15)? as u32], control::CSI_RCS);
        }
        Token::OrnamentControl(ornament) => {
            let params = match ornament {
                Ornament::None => [0, 0],
                Ornament::Hemming(c) => [1, ornament_color(c)],
                Ornament::Shade(c) => [2, ornament_color(c)],
                Ornament::Hollow => [3, 0],
            };
            let params = if matches!(ornament, Ornament::None | Ornament::Hollow) {
                &params[..1]
            } else {
                &params[..]
            };
            csi(&mut buf, params, control::CSI_ORN);
        }
        Token::BuiltinSoundReplay(n) => csi(&mut buf, &[n], control::CSI_PRA),
    }
    Ok(buf)
}

/// トークン列を符号列に変換する。
pub fn encode_tokens<'a, I>(tokens: I) -> Result<Vec<u8>, EncodeError>
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut buf = Vec::new();
    for token in tokens {
        buf.extend_from_slice(&encode_token(token)?);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use hex_literal::hex;

    use super::*;
    use crate::token::{Character, DrcsChar, TimeControlMode};

    fn encode(token: Token) -> Vec<u8> {
        encode_token(&token).unwrap().to_vec()
    }

    #[test]
    fn test_literals() {
        assert_eq!(encode(Token::ActivePositionSet(5, 8)), hex!("1C 48 45"));
        assert_eq!(encode(Token::ColorControlBackground(5)), hex!("C2 90 55"));
        assert_eq!(encode(Token::PalletControl(8)), hex!("C2 90 20 48"));
        assert_eq!(encode(Token::TimeControlWait(58)), hex!("C2 9D 20 7A"));
        assert_eq!(encode(Token::SetWritingFormat(7)), hex!("C2 9B 37 20 53"));
        assert_eq!(
            encode(Token::SetDisplayFormat(960, 540)),
            hex!("C2 9B 39 36 30 3B 35 34 30 20 56"),
        );
        assert_eq!(
            encode(Token::OrnamentControl(Ornament::Hemming(0x17))),
            hex!("C2 9B 31 3B 31 30 37 20 63"),
        );
        assert_eq!(
            encode(Token::OrnamentControl(Ornament::None)),
            hex!("C2 9B 30 20 63"),
        );
        assert_eq!(
            encode(Token::TimeControlMode(TimeControlMode::OffsetTime)),
            hex!("C2 9D 28 42"),
        );
        assert_eq!(
            encode(Token::TimeControlOffset(3_723_004)),
            hex!("C2 9D 29 31 3B 32 3B 33 3B 34 20 41"),
        );
    }

    #[test]
    fn test_characters() {
        assert_eq!(encode(Token::character("字")), "字".as_bytes());
        // 結合文字列は各コードポイントのUTF-8表現の連結
        let grapheme = "\u{304B}\u{3099}";
        assert_eq!(encode(Token::character(grapheme)), grapheme.as_bytes());
        assert_eq!(
            encode(Token::Character(Character::from_drcs("♪"))),
            "♪".as_bytes(),
        );

        assert_matches!(
            encode_token(&Token::character("a\nb")),
            Err(EncodeError::ControlInCharacter)
        );
        assert_matches!(
            encode_token(&Token::character("\u{9B}")),
            Err(EncodeError::ControlInCharacter)
        );
        assert_matches!(
            encode_token(&Token::Drcs(DrcsChar { set: 1, code: 0x21 })),
            Err(EncodeError::Drcs)
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_matches!(
            encode_token(&Token::ActivePositionSet(64, 0)),
            Err(EncodeError::OutOfRange { value: 64, max: 63, .. })
        );
        assert_matches!(
            encode_token(&Token::ColorControlForeground(16)),
            Err(EncodeError::OutOfRange { value: 16, max: 15, .. })
        );
        assert_matches!(
            encode_token(&Token::SetWritingFormat(13)),
            Err(EncodeError::OutOfRange { max: 12, .. })
        );
        assert_matches!(
            encode_token(&Token::TimeControlWait(64)),
            Err(EncodeError::OutOfRange { .. })
        );
    }

    #[test]
    fn test_decode_encoded() {
        let tokens = vec![
            Token::ClearScreen,
            Token::SetWritingFormat(7),
            Token::SetDisplayPosition(58, 29),
            Token::CharacterCompositionDotDesignation(36, 36),
            Token::SetHorizontalSpacing(4),
            Token::SetVerticalSpacing(24),
            Token::ActiveCoordinatePositionSet(10, 20),
            Token::RasterColourCommand(3),
            Token::BuiltinSoundReplay(2),
            Token::ParameterizedActivePositionForward(5),
            Token::ActivePositionSet(17, 7),
            Token::MiddleSize,
            Token::CharacterSizeControl(SizeControl::DoubleSize),
            Token::RedForeground,
            Token::ColorControlHalfBackground(3),
            Token::FlashingControl(FlashingMode::Inverted),
            Token::ConcealmentControl(ConcealmentMode::Replacing(4)),
            Token::PatternPolarityControl(PatternPolarity::Inverted2),
            Token::WritingModeModification(WritingMode::Background),
            Token::HilightingCharacterBlock(1),
            Token::RepeatCharacter(0),
            Token::StartLining,
            Token::StopLining,
            Token::OrnamentControl(Ornament::Shade(0x2A)),
            Token::OrnamentControl(Ornament::Hollow),
            Token::TimeControlPresentationStart(1_000),
            Token::character("テスト"),
            Token::Space,
            Token::Delete,
        ];
        let bytes = encode_tokens(&tokens).unwrap();
        let mut expected = tokens.clone();
        expected.splice(26..27, "テスト".chars().map(Token::character));
        assert_eq!(crate::utf8::tokenize(&bytes).unwrap(), expected);
    }
}
