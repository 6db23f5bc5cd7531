//! 8単位符号とUTF-8符号で共通する制御符号の読み取り。

use arrayvec::ArrayVec;

use crate::token::{
    ConcealmentMode, FlashingMode, Ornament, PatternPolarity, SizeControl, TimeControlMode, Token,
    WritingMode,
};

// C0
pub(crate) const NUL: u8 = 0x00;
pub(crate) const BEL: u8 = 0x07;
pub(crate) const APB: u8 = 0x08;
pub(crate) const APF: u8 = 0x09;
pub(crate) const APD: u8 = 0x0A;
pub(crate) const APU: u8 = 0x0B;
pub(crate) const CS: u8 = 0x0C;
pub(crate) const APR: u8 = 0x0D;
pub(crate) const LS1: u8 = 0x0E;
pub(crate) const LS0: u8 = 0x0F;
pub(crate) const PAPF: u8 = 0x16;
pub(crate) const CAN: u8 = 0x18;
pub(crate) const SS2: u8 = 0x19;
pub(crate) const ESC: u8 = 0x1B;
pub(crate) const APS: u8 = 0x1C;
pub(crate) const SS3: u8 = 0x1D;
pub(crate) const RS: u8 = 0x1E;
pub(crate) const US: u8 = 0x1F;
pub(crate) const SP: u8 = 0x20;
pub(crate) const DEL: u8 = 0x7F;

// C1
pub(crate) const BKF: u8 = 0x80;
pub(crate) const SSZ: u8 = 0x88;
pub(crate) const MSZ: u8 = 0x89;
pub(crate) const NSZ: u8 = 0x8A;
pub(crate) const SZX: u8 = 0x8B;
pub(crate) const COL: u8 = 0x90;
pub(crate) const FLC: u8 = 0x91;
pub(crate) const CDC: u8 = 0x92;
pub(crate) const POL: u8 = 0x93;
pub(crate) const WMM: u8 = 0x94;
pub(crate) const MACRO: u8 = 0x95;
pub(crate) const HLC: u8 = 0x97;
pub(crate) const RPC: u8 = 0x98;
pub(crate) const SPL: u8 = 0x99;
pub(crate) const STL: u8 = 0x9A;
pub(crate) const CSI: u8 = 0x9B;
pub(crate) const TIME: u8 = 0x9D;

/// UTF-8符号でC1制御符号の前に置かれるバイト。
pub(crate) const C1_LEAD: u8 = 0xC2;

// CSIの終端文字
pub(crate) const CSI_SWF: u8 = 0x53;
pub(crate) const CSI_SDF: u8 = 0x56;
pub(crate) const CSI_SSM: u8 = 0x57;
pub(crate) const CSI_SHS: u8 = 0x58;
pub(crate) const CSI_SVS: u8 = 0x59;
pub(crate) const CSI_PLD: u8 = 0x5B;
pub(crate) const CSI_PLU: u8 = 0x5C;
pub(crate) const CSI_SDP: u8 = 0x5F;
pub(crate) const CSI_ACPS: u8 = 0x61;
pub(crate) const CSI_ORN: u8 = 0x63;
pub(crate) const CSI_PRA: u8 = 0x68;
pub(crate) const CSI_RCS: u8 = 0x6E;
pub(crate) const CSI_SCS: u8 = 0x6F;

/// 制御符号のパラメータを読み込む元。
pub(crate) trait ByteSource {
    /// 次のバイトを読み込む。
    fn read_byte(&mut self) -> Option<u8>;
}

/// パラメータの途中で符号列が終了した。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Eof;

#[inline]
fn next<S: ByteSource + ?Sized>(src: &mut S) -> Result<u8, Eof> {
    src.read_byte().ok_or(Eof)
}

/// 1バイトで表される制御符号（C0およびSP・DEL）を読み取る。
///
/// `code`は読み込み済みの制御符号で、符号集合の呼び出しに関わる符号は呼び出し元で処理すること。
/// 戻り値が`Ok(None)`の場合は符号を読み飛ばしたことを表す。
pub(crate) fn read_c0<S: ByteSource + ?Sized>(
    src: &mut S,
    code: u8,
) -> Result<Option<Token>, Eof> {
    let token = match code {
        NUL => return Ok(None),
        BEL => {
            log::trace!("deprecated BEL");
            return Ok(None);
        }
        APB => Token::ActivePositionBackward,
        APF => Token::ActivePositionForward,
        APD => Token::ActivePositionDown,
        APU => Token::ActivePositionUp,
        CS => Token::ClearScreen,
        APR => Token::ActivePositionReturn,
        PAPF => Token::ParameterizedActivePositionForward(next(src)? & 0x3F),
        CAN => {
            log::trace!("deprecated CAN");
            return Ok(None);
        }
        APS => {
            // 行、列の順
            let y = next(src)? & 0x3F;
            let x = next(src)? & 0x3F;
            Token::ActivePositionSet(x, y)
        }
        RS => {
            log::trace!("unused RS");
            return Ok(None);
        }
        US => {
            log::trace!("unused US");
            return Ok(None);
        }
        SP => Token::Space,
        DEL => Token::Delete,
        _ => {
            log::trace!("unknown C0: {:02X}", code);
            return Ok(None);
        }
    };
    Ok(Some(token))
}

/// C1制御符号を読み取る。
///
/// MACROは符号化方式ごとに扱いが異なるため呼び出し元で処理すること。
/// 戻り値が`Ok(None)`の場合は符号を読み飛ばしたことを表す。
pub(crate) fn read_c1<S: ByteSource + ?Sized>(
    src: &mut S,
    code: u8,
) -> Result<Option<Token>, Eof> {
    let token = match code {
        0x80 => Token::BlackForeground,
        0x81 => Token::RedForeground,
        0x82 => Token::GreenForeground,
        0x83 => Token::YellowForeground,
        0x84 => Token::BlueForeground,
        0x85 => Token::MagentaForeground,
        0x86 => Token::CyanForeground,
        0x87 => Token::WhiteForeground,

        SSZ => Token::SmallSize,
        MSZ => Token::MiddleSize,
        NSZ => Token::NormalSize,
        SZX => match next(src)? {
            0x60 => Token::CharacterSizeControl(SizeControl::Tiny),
            0x41 => Token::CharacterSizeControl(SizeControl::DoubleHeight),
            0x44 => Token::CharacterSizeControl(SizeControl::DoubleWidth),
            0x45 => Token::CharacterSizeControl(SizeControl::DoubleSize),
            0x6B => Token::CharacterSizeControl(SizeControl::Special1),
            0x64 => Token::CharacterSizeControl(SizeControl::Special2),
            p1 => {
                log::trace!("unknown SZX: p1={:02X}", p1);
                return Ok(None);
            }
        },

        COL => match next(src)? {
            p1 @ 0x40..=0x4F => Token::ColorControlForeground(p1 & 0x0F),
            p1 @ 0x50..=0x5F => Token::ColorControlBackground(p1 & 0x0F),
            p1 @ 0x60..=0x6F => Token::ColorControlHalfForeground(p1 & 0x0F),
            p1 @ 0x70..=0x7F => Token::ColorControlHalfBackground(p1 & 0x0F),
            0x20 => Token::PalletControl(next(src)? & 0x0F),
            p1 => {
                log::trace!("unknown COL: p1={:02X}", p1);
                return Ok(None);
            }
        },

        FLC => match next(src)? {
            0x40 => Token::FlashingControl(FlashingMode::Normal),
            0x47 => Token::FlashingControl(FlashingMode::Inverted),
            0x4F => Token::FlashingControl(FlashingMode::Stop),
            p1 => {
                log::trace!("unknown FLC: p1={:02X}", p1);
                return Ok(None);
            }
        },

        CDC => match next(src)? {
            0x40 => Token::ConcealmentControl(ConcealmentMode::Start),
            0x4F => Token::ConcealmentControl(ConcealmentMode::Stop),
            0x20 => Token::ConcealmentControl(ConcealmentMode::Replacing(next(src)? & 0x0F)),
            p1 => {
                log::trace!("unknown CDC: p1={:02X}", p1);
                return Ok(None);
            }
        },

        POL => match next(src)? {
            0x40 => Token::PatternPolarityControl(PatternPolarity::Normal),
            0x41 => Token::PatternPolarityControl(PatternPolarity::Inverted1),
            0x42 => Token::PatternPolarityControl(PatternPolarity::Inverted2),
            p1 => {
                log::trace!("unknown POL: p1={:02X}", p1);
                return Ok(None);
            }
        },

        WMM => match next(src)? {
            0x40 => Token::WritingModeModification(WritingMode::Both),
            0x44 => Token::WritingModeModification(WritingMode::Foreground),
            0x45 => Token::WritingModeModification(WritingMode::Background),
            p1 => {
                log::trace!("unknown WMM: p1={:02X}", p1);
                return Ok(None);
            }
        },

        HLC => Token::HilightingCharacterBlock(next(src)? & 0x0F),
        RPC => Token::RepeatCharacter(next(src)? & 0x3F),
        SPL => Token::StopLining,
        STL => Token::StartLining,

        CSI => return read_csi(src),
        TIME => return read_time(src),

        _ => {
            log::trace!("unknown C1: {:02X}", code);
            return Ok(None);
        }
    };
    Ok(Some(token))
}

/// 中間文字`0x20`で終わるパラメータ列。
enum Params {
    /// パラメータと中間文字の次にある終端文字。
    Read(ArrayVec<u32, 4>, u8),
    /// パラメータなしの終端文字。
    Bare(u8),
    /// 不正なパラメータのため終端文字まで読み飛ばした。
    Skipped,
}

/// 中間文字と終端文字まで読み飛ばす。
fn skip_to_the_end<S: ByteSource + ?Sized>(src: &mut S) -> Result<Params, Eof> {
    while next(src)? != 0x20 {}
    let _: u8 = next(src)?;
    Ok(Params::Skipped)
}

/// 10進数のパラメータを`;`区切りで読み込む。
///
/// `bare`に含まれる終端文字はパラメータなしで現れる。
fn read_params<S: ByteSource + ?Sized>(src: &mut S, bare: &[u8]) -> Result<Params, Eof> {
    // パラメータは最大4つ
    let mut params = ArrayVec::<u32, 4>::new();
    let mut param: u32 = 0;
    loop {
        match next(src)? {
            p @ 0x30..=0x39 => {
                let Some(p) = param
                    .checked_mul(10)
                    .and_then(|param| param.checked_add((p - 0x30) as u32))
                else {
                    log::trace!("too large param");
                    return skip_to_the_end(src);
                };
                param = p;
            }

            0x3B => {
                if params.try_push(param).is_err() {
                    log::trace!("too many params");
                    return skip_to_the_end(src);
                }
                param = 0;
            }

            // 中間文字
            0x20 => {
                let f = next(src)?;
                if params.try_push(param).is_err() {
                    log::trace!("too many params");
                    return Ok(Params::Skipped);
                }
                return Ok(Params::Read(params, f));
            }

            f if params.is_empty() && bare.contains(&f) => return Ok(Params::Bare(f)),

            b => {
                log::trace!("unknown byte in params: {:02X}", b);
                return skip_to_the_end(src);
            }
        }
    }
}

/// ORNなどで使われる`P2`を`パレット番号×16＋色番号`に変換する。
#[inline]
fn color_index(p: u32) -> u8 {
    ((((p / 100) & 0x0F) as u8) << 4) | ((p % 100) & 0x0F) as u8
}

fn read_csi<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<Token>, Eof> {
    let (f, params) = match read_params(src, &[CSI_PLD, CSI_PLU, CSI_SCS])? {
        Params::Read(params, f) => (f, params),
        Params::Bare(f) => {
            log::trace!("deprecated CSI: {:02X}", f);
            return Ok(None);
        }
        Params::Skipped => return Ok(None),
    };

    let token = match (f, params.as_slice()) {
        (CSI_SWF, &[p1 @ 0..=12]) => Token::SetWritingFormat(p1 as u8),
        (CSI_SDF, &[p1, p2]) => Token::SetDisplayFormat(p1, p2),
        (CSI_SDP, &[p1, p2]) => Token::SetDisplayPosition(p1, p2),
        (CSI_SSM, &[p1, p2]) => Token::CharacterCompositionDotDesignation(p1, p2),
        (CSI_SHS, &[p1]) => Token::SetHorizontalSpacing(p1),
        (CSI_SVS, &[p1]) => Token::SetVerticalSpacing(p1),
        (CSI_ACPS, &[p1, p2]) => Token::ActiveCoordinatePositionSet(p1, p2),
        (CSI_RCS, &[p1 @ 0..=15]) => Token::RasterColourCommand(p1 as u8),
        (CSI_ORN, &[0] | &[0, _]) => Token::OrnamentControl(Ornament::None),
        (CSI_ORN, &[1, p2]) => Token::OrnamentControl(Ornament::Hemming(color_index(p2))),
        (CSI_ORN, &[2, p2]) => Token::OrnamentControl(Ornament::Shade(color_index(p2))),
        (CSI_ORN, &[3] | &[3, _]) => Token::OrnamentControl(Ornament::Hollow),
        (CSI_PRA, &[p1]) => Token::BuiltinSoundReplay(p1),
        (f, params) => {
            log::trace!("unknown CSI: {:02X}={:?}", f, params);
            return Ok(None);
        }
    };
    Ok(Some(token))
}

fn read_time<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<Token>, Eof> {
    let token = match next(src)? {
        0x20 => Token::TimeControlWait(next(src)? & 0x3F),
        0x28 => match next(src)? {
            p2 @ 0x40..=0x43 => Token::TimeControlMode(TimeControlMode::from_bits(p2)),
            p2 => {
                log::trace!("unknown TIME: p1=28, p2={:02X}", p2);
                return Ok(None);
            }
        },
        0x29 => {
            let (f, params) = match read_params(src, &[])? {
                Params::Read(params, f) => (f, params),
                Params::Bare(_) | Params::Skipped => return Ok(None),
            };

            match (f, params.as_slice()) {
                (0x40, &[hour, minute, second, milli]) => {
                    Token::TimeControlPresentationStart(to_milli(hour, minute, second, milli))
                }
                (0x41, &[hour, minute, second, milli]) => {
                    Token::TimeControlOffset(to_milli(hour, minute, second, milli))
                }
                (f, params) => {
                    log::trace!("unknown TIME: p1=29, f={:02X}, params={:?}", f, params);
                    return Ok(None);
                }
            }
        }
        p1 => {
            log::trace!("unknown TIME: p1={:02X}", p1);
            return Ok(None);
        }
    };
    Ok(Some(token))
}

#[inline]
fn to_milli(hour: u32, minute: u32, second: u32, milli: u32) -> u64 {
    (hour as u64) * (60 * 60 * 1000)
        + (minute as u64) * (60 * 1000)
        + (second as u64) * 1000
        + (milli as u64)
}
