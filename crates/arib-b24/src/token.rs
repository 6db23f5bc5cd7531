//! 字幕文を構成するトークン。
//!
//! 8単位符号・UTF-8符号のどちらから復号しても同じ[`Token`]になり、
//! [`crate::parser`]と[`crate::encode`]はこの型のみを扱う。

use std::fmt;

/// 文字サイズ。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharSize {
    /// 小型。
    Small,
    /// 中型。
    Middle,
    /// 標準。
    #[default]
    Normal,
    /// 超小型。
    Tiny,
    /// 縦倍。
    DoubleHeight,
    /// 横倍。
    DoubleWidth,
    /// 縦横倍。
    DoubleSize,
    /// 特殊1。
    Special1,
    /// 特殊2。
    Special2,
}

impl CharSize {
    /// 文字サイズが小さめの場合に`true`を返す。
    #[inline]
    pub fn is_small(self) -> bool {
        matches!(self, CharSize::Small | CharSize::Middle | CharSize::Tiny)
    }

    /// 標準サイズに対する横方向と縦方向の倍率。
    pub fn magnification(self) -> (f64, f64) {
        match self {
            CharSize::Small => (0.5, 0.5),
            CharSize::Middle => (0.5, 1.),
            CharSize::Normal => (1., 1.),
            CharSize::Tiny => (0.25, 0.25),
            CharSize::DoubleHeight => (1., 2.),
            CharSize::DoubleWidth => (2., 1.),
            CharSize::DoubleSize => (2., 2.),
            CharSize::Special1 | CharSize::Special2 => (1., 1.),
        }
    }
}

/// SZXで指定される文字サイズ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeControl {
    /// 超小型。
    Tiny,
    /// 縦倍。
    DoubleHeight,
    /// 横倍。
    DoubleWidth,
    /// 縦横倍。
    DoubleSize,
    /// 特殊1。
    Special1,
    /// 特殊2。
    Special2,
}

impl From<SizeControl> for CharSize {
    fn from(value: SizeControl) -> CharSize {
        match value {
            SizeControl::Tiny => CharSize::Tiny,
            SizeControl::DoubleHeight => CharSize::DoubleHeight,
            SizeControl::DoubleWidth => CharSize::DoubleWidth,
            SizeControl::DoubleSize => CharSize::DoubleSize,
            SizeControl::Special1 => CharSize::Special1,
            SizeControl::Special2 => CharSize::Special2,
        }
    }
}

/// FLC、フラッシング制御。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlashingMode {
    /// 正相フラッシング開始。
    Normal,
    /// 逆相フラッシング開始。
    Inverted,
    /// フラッシング終了。
    Stop,
}

/// CDC、コンシールメント制御。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcealmentMode {
    /// コンシールメント開始。
    Start,
    /// 置換コンシールメント開始。
    ///
    /// 内包する値は置換の種類で`0..=15`の範囲である。
    Replacing(u8),
    /// コンシールメント終了。
    Stop,
}

/// POL、パターン極性。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternPolarity {
    /// 正常極性。
    #[default]
    Normal,
    /// 反転極性1。
    Inverted1,
    /// 反転極性2。
    Inverted2,
}

/// WMM、書込みモード。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WritingMode {
    /// 前景色及び背景色を書き込む。
    #[default]
    Both,
    /// 前景色のみ書き込む。
    Foreground,
    /// 背景色のみ書き込む。
    Background,
}

/// CSIのORN、文字飾り指定。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ornament {
    /// 文字飾りなし。
    #[default]
    None,
    /// 縁取り。
    ///
    /// 内包する値は文字飾り色のカラーマップアドレス（パレット番号×16＋色番号）である。
    Hemming(u8),
    /// 影付き。
    ///
    /// 内包する値は文字飾り色のカラーマップアドレス（パレット番号×16＋色番号）である。
    Shade(u8),
    /// 中抜き。
    Hollow,
}

/// 時刻制御モード。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeControlMode {
    /// フリー。
    Free,
    /// リアルタイム。
    RealTime,
    /// オフセットタイム。
    OffsetTime,
    /// 予約。
    Reserved,
}

impl TimeControlMode {
    /// 2ビットの値から`TimeControlMode`を生成する。上位ビットは無視される。
    #[inline]
    pub fn from_bits(value: u8) -> TimeControlMode {
        match value & 0b11 {
            0b00 => TimeControlMode::Free,
            0b01 => TimeControlMode::RealTime,
            0b10 => TimeControlMode::OffsetTime,
            _ => TimeControlMode::Reserved,
        }
    }

    /// 2ビットの値として返す。
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            TimeControlMode::Free => 0b00,
            TimeControlMode::RealTime => 0b01,
            TimeControlMode::OffsetTime => 0b10,
            TimeControlMode::Reserved => 0b11,
        }
    }
}

/// 動的に再定義が可能な外字（DRCS）への参照。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrcsChar {
    /// DRCSの集合番号で`0..=15`の範囲である。
    ///
    /// DRCS-0のみ2バイト符号で、それ以外は1バイト符号である。
    pub set: u8,
    /// 符号。
    ///
    /// DRCS-0では1バイト目を上位、2バイト目を下位に持ち、
    /// それ以外では`0x21..=0x7E`の1バイト符号を持つ。
    pub code: u16,
}

impl DrcsChar {
    /// DRCS-0から順の連番を得る。
    ///
    /// DRCS-0の場合は内包する値がそのまま使われ、
    /// DRCS-1以降はその後に続くように値が続く。
    ///
    /// # サンプル
    ///
    /// ```
    /// use arib_b24::token::DrcsChar;
    ///
    /// assert_eq!(DrcsChar { set: 0, code: 0x2121 }.to_number(), 0);
    /// assert_eq!(DrcsChar { set: 1, code: 0x21 }.to_number(), 8836);
    /// assert_eq!(DrcsChar { set: 2, code: 0x21 }.to_number(), 8930);
    /// assert_eq!(DrcsChar { set: 3, code: 0x22 }.to_number(), 9025);
    /// ```
    pub fn to_number(&self) -> u16 {
        if self.set == 0 {
            let c1 = (self.code >> 8).saturating_sub(0x21);
            let c2 = (self.code & 0xFF).saturating_sub(0x21);
            c1 * 94 + c2
        } else {
            8836 + 94 * (self.set as u16 - 1) + (self.code & 0xFF).saturating_sub(0x21)
        }
    }
}

/// 図形として描画される文字。
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Character {
    /// 書記素クラスタ。
    ///
    /// 未定義の符号集合の文字は空文字列となる。
    pub grapheme: String,
    /// DRCSの置換によって得られた文字であれば`true`。
    pub drcs: bool,
}

impl Character {
    /// 通常の文字を生成する。
    #[inline]
    pub fn new<S: Into<String>>(grapheme: S) -> Character {
        Character {
            grapheme: grapheme.into(),
            drcs: false,
        }
    }

    /// DRCSを置換した文字を生成する。
    #[inline]
    pub fn from_drcs<S: Into<String>>(grapheme: S) -> Character {
        Character {
            grapheme: grapheme.into(),
            drcs: true,
        }
    }
}

impl fmt::Debug for Character {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.grapheme, f)?;
        if self.drcs {
            f.write_str("(DRCS)")?;
        }
        Ok(())
    }
}

/// 字幕文を構成するトークン。
///
/// 描画される図形（[`Character`]・DRCS・空白）と、状態を変更する制御符号からなる。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// 図形文字。
    Character(Character),

    /// 置換されなかったDRCS。
    Drcs(DrcsChar),

    /// SP、スペース。
    Space,

    /// DEL、デリート。
    Delete,

    /// APB、動作位置後退。
    ActivePositionBackward,

    /// APF、動作位置前進。
    ActivePositionForward,

    /// APD、動作行前進。
    ActivePositionDown,

    /// APU、動作行後退。
    ActivePositionUp,

    /// APR、動作位置改行。
    ActivePositionReturn,

    /// PAPF、指定動作位置前進。
    ///
    /// 内包する値は`0..=63`の範囲である。
    ParameterizedActivePositionForward(u8),

    /// APS、動作位置指定。
    ///
    /// 内包する値は列（`x`）と行（`y`）で、どちらとも`0..=63`の範囲である。
    /// 符号化時は行、列の順に並ぶ。
    ActivePositionSet(u8, u8),

    /// CS、画面消去。
    ClearScreen,

    /// BKF、黒。
    BlackForeground,
    /// RDF、赤。
    RedForeground,
    /// GRF、緑。
    GreenForeground,
    /// YLF、黄。
    YellowForeground,
    /// BLF、青。
    BlueForeground,
    /// MGF、マゼンタ。
    MagentaForeground,
    /// CNF、シアン。
    CyanForeground,
    /// WHF、白。
    WhiteForeground,

    /// COLでの前景色の指定。
    ///
    /// 内包する値はカラーパレット下位アドレスで`0..=15`の範囲である。
    ColorControlForeground(u8),

    /// COLでの背景色の指定。
    ///
    /// 内包する値はカラーパレット下位アドレスで`0..=15`の範囲である。
    ColorControlBackground(u8),

    /// COLでの前中間色の指定。
    ///
    /// 内包する値はカラーパレット下位アドレスで`0..=15`の範囲である。
    ColorControlHalfForeground(u8),

    /// COLでの背中間色の指定。
    ///
    /// 内包する値はカラーパレット下位アドレスで`0..=15`の範囲である。
    ColorControlHalfBackground(u8),

    /// COLでのパレット番号の指定。
    ///
    /// 内包する値はパレット番号で`0..=15`の範囲である。
    PalletControl(u8),

    /// SSZ、小型サイズ。
    SmallSize,
    /// MSZ、中型サイズ。
    MiddleSize,
    /// NSZ、標準サイズ。
    NormalSize,
    /// SZX、指定サイズ。
    CharacterSizeControl(SizeControl),

    /// FLC、フラッシング制御。
    FlashingControl(FlashingMode),

    /// CDC、コンシールメント制御。
    ConcealmentControl(ConcealmentMode),

    /// POL、パターン極性。
    PatternPolarityControl(PatternPolarity),

    /// WMM、書込みモード変更。
    WritingModeModification(WritingMode),

    /// HLC、囲み制御。
    ///
    /// 内包する値は`0`なら囲み終了、`1..=15`なら囲み開始である。
    HilightingCharacterBlock(u8),

    /// RPC、文字繰り返し。
    ///
    /// 内包する値は`0..=63`の範囲で、`0`は行末までの繰り返しを表す。
    RepeatCharacter(u8),

    /// STL、アンダーライン開始およびモザイク分離開始。
    StartLining,

    /// SPL、アンダーライン終了およびモザイク分離終了。
    StopLining,

    /// TIMEでの処理待ち。
    ///
    /// 内包する値は中断する時間（単位は0.1秒）で`0..=63`の範囲である。
    TimeControlWait(u8),

    /// TIMEでの時刻制御モード。
    TimeControlMode(TimeControlMode),

    /// TIMEでの提示開始時刻。
    ///
    /// 内包する値は時刻（単位はミリ秒）。
    TimeControlPresentationStart(u64),

    /// TIMEでのオフセット時間。
    ///
    /// 内包する値は時間（単位はミリ秒）。
    TimeControlOffset(u64),

    /// CSIのSWF、書式選択。
    ///
    /// 内包する値は書式の種類で、範囲は`0..=12`である。
    SetWritingFormat(u8),

    /// CSIのSDF、表示構成ドット指定。
    ///
    /// 内包する値は水平方向のドット数と垂直方向のドット数である。
    SetDisplayFormat(u32, u32),

    /// CSIのSDP、表示位置指定。
    ///
    /// 内包する値は水平方向の座標と垂直方向の座標である。
    SetDisplayPosition(u32, u32),

    /// CSIのSSM、文字構成ドット指定。
    ///
    /// 内包する値は横方向のドット数と縦方向のドット数である。
    CharacterCompositionDotDesignation(u32, u32),

    /// CSIのSHS、字間隔指定。
    SetHorizontalSpacing(u32),

    /// CSIのSVS、行間隔指定。
    SetVerticalSpacing(u32),

    /// CSIのACPS、動作位置座標指定。
    ActiveCoordinatePositionSet(u32, u32),

    /// CSIのRCS、ラスタ色制御。
    ///
    /// 内包する値はラスタ色で、`0..=15`の範囲である。
    RasterColourCommand(u8),

    /// CSIのORN、文字飾り指定。
    OrnamentControl(Ornament),

    /// CSIのPRA、内蔵音再生。
    BuiltinSoundReplay(u32),
}

impl Token {
    /// 文字を表すトークンを生成する。
    #[inline]
    pub fn character<S: Into<String>>(grapheme: S) -> Token {
        Token::Character(Character::new(grapheme))
    }

    /// 描画されるトークンであれば`true`を返す。
    #[inline]
    pub fn is_drawable(&self) -> bool {
        matches!(
            self,
            Token::Character(_) | Token::Drcs(_) | Token::Space | Token::Delete
        )
    }

    /// ARIB STD-B24における制御符号の略称を返す。
    ///
    /// 制御符号以外は`None`を返す。
    pub fn mnemonic(&self) -> Option<&'static str> {
        Some(match self {
            Token::Character(_) | Token::Drcs(_) => return None,
            Token::Space => "SP",
            Token::Delete => "DEL",
            Token::ActivePositionBackward => "APB",
            Token::ActivePositionForward => "APF",
            Token::ActivePositionDown => "APD",
            Token::ActivePositionUp => "APU",
            Token::ActivePositionReturn => "APR",
            Token::ParameterizedActivePositionForward(_) => "PAPF",
            Token::ActivePositionSet(..) => "APS",
            Token::ClearScreen => "CS",
            Token::BlackForeground => "BKF",
            Token::RedForeground => "RDF",
            Token::GreenForeground => "GRF",
            Token::YellowForeground => "YLF",
            Token::BlueForeground => "BLF",
            Token::MagentaForeground => "MGF",
            Token::CyanForeground => "CNF",
            Token::WhiteForeground => "WHF",
            Token::ColorControlForeground(_)
            | Token::ColorControlBackground(_)
            | Token::ColorControlHalfForeground(_)
            | Token::ColorControlHalfBackground(_)
            | Token::PalletControl(_) => "COL",
            Token::SmallSize => "SSZ",
            Token::MiddleSize => "MSZ",
            Token::NormalSize => "NSZ",
            Token::CharacterSizeControl(_) => "SZX",
            Token::FlashingControl(_) => "FLC",
            Token::ConcealmentControl(_) => "CDC",
            Token::PatternPolarityControl(_) => "POL",
            Token::WritingModeModification(_) => "WMM",
            Token::HilightingCharacterBlock(_) => "HLC",
            Token::RepeatCharacter(_) => "RPC",
            Token::StartLining => "STL",
            Token::StopLining => "SPL",
            Token::TimeControlWait(_)
            | Token::TimeControlMode(_)
            | Token::TimeControlPresentationStart(_)
            | Token::TimeControlOffset(_) => "TIME",
            Token::SetWritingFormat(_) => "SWF",
            Token::SetDisplayFormat(..) => "SDF",
            Token::SetDisplayPosition(..) => "SDP",
            Token::CharacterCompositionDotDesignation(..) => "SSM",
            Token::SetHorizontalSpacing(_) => "SHS",
            Token::SetVerticalSpacing(_) => "SVS",
            Token::ActiveCoordinatePositionSet(..) => "ACPS",
            Token::RasterColourCommand(_) => "RCS",
            Token::OrnamentControl(_) => "ORN",
            Token::BuiltinSoundReplay(_) => "PRA",
        })
    }
}
