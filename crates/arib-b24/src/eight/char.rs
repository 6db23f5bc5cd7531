//! 8単位符号の符号集合。

use std::fmt;

/// 図形領域の符号で、`0x21..=0x7E`の範囲のみ保持する。
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphicCode(pub(super) u8);

impl GraphicCode {
    /// `u8`の値から`GraphicCode`を生成する。
    ///
    /// GR領域の符号（`0xA1..=0xFE`）はGL領域の符号に変換される。
    /// 図形領域にない符号の場合は`None`を返す。
    #[inline]
    pub fn new(n: u8) -> Option<GraphicCode> {
        match n {
            0x21..=0x7E | 0xA1..=0xFE => Some(GraphicCode(n & 0x7F)),
            _ => None,
        }
    }

    /// 符号を`0x21..=0x7E`の範囲に制限された`u8`で返す。
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// `0x21`を`0`とした区の中の位置を返す。
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 0x21) as usize
    }
}

impl fmt::Debug for GraphicCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("0x")?;
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// 符号の指示先。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Designator {
    /// G0に対する指示。
    G0 = 0,
    /// G1に対する指示。
    G1 = 1,
    /// G2に対する指示。
    G2 = 2,
    /// G3に対する指示。
    G3 = 3,
}

impl Designator {
    /// エスケープシーケンスの中間文字（`0x28..=0x2B`）から指示先を得る。
    #[inline]
    pub(crate) fn from_intermediate(b: u8) -> Option<Designator> {
        match b {
            0x28 => Some(Designator::G0),
            0x29 => Some(Designator::G1),
            0x2A => Some(Designator::G2),
            0x2B => Some(Designator::G3),
            _ => None,
        }
    }
}

/// 符号集合の種類。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetKind {
    /// 辞書を引いて文字に変換する符号集合。
    Character,
    /// DRCSを参照する符号集合。
    Drcs,
    /// マクロ符号集合。
    Macro,
}

/// 文字符号集合。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GraphicSet {
    /// 漢字、2バイト符号。
    Kanji,
    /// 英数、1バイト符号。
    Alnum,
    /// 平仮名、1バイト符号。
    Hira,
    /// 片仮名、1バイト符号。
    Kata,
    /// モザイクA、1バイト符号。
    MosaicA,
    /// モザイクB、1バイト符号。
    MosaicB,
    /// モザイクC、1バイト符号。
    MosaicC,
    /// モザイクD、1バイト符号。
    MosaicD,
    /// プロポーショナル英数、1バイト符号。
    PropAlnum,
    /// プロポーショナル平仮名、1バイト符号。
    PropHira,
    /// プロポーショナル片仮名、1バイト符号。
    PropKata,
    /// JIS X 0201 片仮名、1バイト符号。
    JisXKata,
    /// JIS互換漢字1面、2バイト符号。
    JisKanjiPlane1,
    /// JIS互換漢字2面、2バイト符号。
    JisKanjiPlane2,
    /// 追加記号、2バイト符号。
    ExtraSymbols,
    /// DRCS。
    ///
    /// 内包する値は`0..=15`の集合番号で、DRCS-0のみ2バイト符号、それ以外は1バイト符号。
    Drcs(u8),
    /// マクロ、1バイト符号。
    Macro,
    /// 未定義の終端文字で指示された符号集合。
    ///
    /// 内包する値はバイト数。
    Unknown(u8),
}

impl GraphicSet {
    /// 符号集合の1文字のバイト数。
    #[inline]
    pub fn width(self) -> usize {
        match self {
            GraphicSet::Kanji
            | GraphicSet::JisKanjiPlane1
            | GraphicSet::JisKanjiPlane2
            | GraphicSet::ExtraSymbols
            | GraphicSet::Drcs(0) => 2,
            GraphicSet::Unknown(n) => n as usize,
            _ => 1,
        }
    }

    /// 符号集合の種類。
    #[inline]
    pub fn kind(self) -> SetKind {
        match self {
            GraphicSet::Drcs(_) => SetKind::Drcs,
            GraphicSet::Macro => SetKind::Macro,
            _ => SetKind::Character,
        }
    }

    /// 1バイトGセットの終端文字から符号集合を得る。
    pub(crate) fn from_final_1(f: u8) -> Option<GraphicSet> {
        Some(match f {
            0x4A => GraphicSet::Alnum,
            0x30 => GraphicSet::Hira,
            0x31 => GraphicSet::Kata,
            0x32 => GraphicSet::MosaicA,
            0x33 => GraphicSet::MosaicB,
            0x34 => GraphicSet::MosaicC,
            0x35 => GraphicSet::MosaicD,
            0x36 => GraphicSet::PropAlnum,
            0x37 => GraphicSet::PropHira,
            0x38 => GraphicSet::PropKata,
            0x49 => GraphicSet::JisXKata,
            _ => return None,
        })
    }

    /// 2バイトGセットの終端文字から符号集合を得る。
    pub(crate) fn from_final_2(f: u8) -> Option<GraphicSet> {
        Some(match f {
            0x42 => GraphicSet::Kanji,
            0x39 => GraphicSet::JisKanjiPlane1,
            0x3A => GraphicSet::JisKanjiPlane2,
            0x3B => GraphicSet::ExtraSymbols,
            _ => return None,
        })
    }

    /// 1バイトDRCSの終端文字から符号集合を得る。
    pub(crate) fn from_final_drcs_1(f: u8) -> Option<GraphicSet> {
        match f {
            0x41..=0x4F => Some(GraphicSet::Drcs(f - 0x40)),
            0x70 => Some(GraphicSet::Macro),
            _ => None,
        }
    }
}
