//! ARIB STD-B24第一編で規定される字幕に関する定義。

use crate::crc16;
use crate::error::EncodeError;
use crate::lang::LangCode;
use crate::token::TimeControlMode;
use crate::utils::{BufExt, BytesExt, MAX_BCD_MILLI};

/// データグループ。
#[derive(Debug, PartialEq, Eq)]
pub struct DataGroup<'a> {
    /// データグループ識別、DGI（6ビット）。
    pub data_group_id: u8,
    /// データグループバージョン（2ビット）。
    pub data_group_version: u8,
    /// データグループリンク番号。
    pub data_group_link_number: u8,
    /// 最終データグループリンク番号。
    pub last_data_group_link_number: u8,
    /// データグループデータ、DGD。
    pub data_group_data: &'a [u8],
}

impl<'a> DataGroup<'a> {
    /// `data`から`DataGroup`を読み取る。
    ///
    /// データグループの後にCRC16があれば検証するが、一致しなくてもエラーとはしない。
    pub fn read(data: &'a [u8]) -> Option<DataGroup<'a>> {
        if data.len() < 5 {
            log::debug!("invalid DataGroup");
            return None;
        }

        let data_group_id = (data[0] & 0b11111100) >> 2;
        let data_group_version = data[0] & 0b00000011;
        let data_group_link_number = data[1];
        let last_data_group_link_number = data[2];
        let data_group_size = data[3..=4].read_be_16();
        let Some(data_group_data) = data[5..].get(..data_group_size as usize) else {
            log::debug!("invalid DataGroup::data_group_size");
            return None;
        };

        match data.get(..5 + data_group_size as usize + 2) {
            Some(with_crc) => {
                if crc16::calc(with_crc) != 0 {
                    log::debug!("invalid DataGroup::CRC_16");
                }
            }
            None => log::debug!("missing DataGroup::CRC_16"),
        }

        Some(DataGroup {
            data_group_id,
            data_group_version,
            data_group_link_number,
            last_data_group_link_number,
            data_group_data,
        })
    }

    /// `DataGroup`をCRC16と共に`buf`に書き込む。
    ///
    /// `data_group_data`の長さが65535を超える場合はエラーを返す。
    pub fn write(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let size = check_len("data_group_size", self.data_group_data.len(), 0xFFFF)?;

        let start = buf.len();
        buf.push((self.data_group_id << 2) | (self.data_group_version & 0b11));
        buf.push(self.data_group_link_number);
        buf.push(self.last_data_group_link_number);
        buf.put_be_16(size as u16);
        buf.extend_from_slice(self.data_group_data);

        let crc = crc16::calc(&buf[start..]);
        buf.put_be_16(crc);
        Ok(())
    }
}

/// 字幕のグループ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaptionGroup {
    /// Aグループ。
    A,
    /// Bグループ。
    B,
}

/// 表示モード。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayMode {
    /// 自動表示。
    AutoDisplay,
    /// 自動非表示。
    AutoHide,
    /// 選択表示。
    Selectable,
    /// 受信時特定条件自動表示／非表示。
    ///
    /// ただし記録再生時では未定義。
    MayDisplay,
}

impl DisplayMode {
    /// 2ビットの値から`DisplayMode`を生成する。上位ビットは無視される。
    #[inline]
    pub fn new(value: u8) -> DisplayMode {
        match value & 0b11 {
            0b00 => DisplayMode::AutoDisplay,
            0b01 => DisplayMode::AutoHide,
            0b10 => DisplayMode::Selectable,
            _ => DisplayMode::MayDisplay,
        }
    }

    /// 2ビットの値として返す。
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            DisplayMode::AutoDisplay => 0b00,
            DisplayMode::AutoHide => 0b01,
            DisplayMode::Selectable => 0b10,
            DisplayMode::MayDisplay => 0b11,
        }
    }
}

/// 字幕の表示形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaptionFormat {
    /// 標準密度の横書。
    StandardDensityHorz,
    /// 標準密度の縦書。
    StandardDensityVert,
    /// 高密度の横書。
    HighDensityHorz,
    /// 高密度の縦書。
    HighDensityVert,
    /// 欧文の横書き。
    WesternHorz,
    /// 1920x1080の横書。
    FhdHorz,
    /// 1920x1080の縦書。
    FhdVert,
    /// 960x540の横書。
    QhdHorz,
    /// 960x540の縦書。
    QhdVert,
    /// 1280x720の横書。
    HdHorz,
    /// 1280x720の縦書。
    HdVert,
    /// 720x480の横書。
    SdHorz,
    /// 720x480の縦書。
    SdVert,
    /// 不明。
    ///
    /// 内包する値は4ビットの値。
    Unknown(u8),
}

impl CaptionFormat {
    /// 4ビットの値から`CaptionFormat`を生成する。上位ビットは無視される。
    pub fn new(value: u8) -> CaptionFormat {
        match value & 0x0F {
            0b0000 => CaptionFormat::StandardDensityHorz,
            0b0001 => CaptionFormat::StandardDensityVert,
            0b0010 => CaptionFormat::HighDensityHorz,
            0b0011 => CaptionFormat::HighDensityVert,
            0b0100 => CaptionFormat::WesternHorz,
            0b0110 => CaptionFormat::FhdHorz,
            0b0111 => CaptionFormat::FhdVert,
            0b1000 => CaptionFormat::QhdHorz,
            0b1001 => CaptionFormat::QhdVert,
            0b1010 => CaptionFormat::SdHorz,
            0b1011 => CaptionFormat::SdVert,
            0b1100 => CaptionFormat::HdHorz,
            0b1101 => CaptionFormat::HdVert,
            v => CaptionFormat::Unknown(v),
        }
    }

    /// 4ビットの値として返す。
    pub fn bits(self) -> u8 {
        match self {
            CaptionFormat::StandardDensityHorz => 0b0000,
            CaptionFormat::StandardDensityVert => 0b0001,
            CaptionFormat::HighDensityHorz => 0b0010,
            CaptionFormat::HighDensityVert => 0b0011,
            CaptionFormat::WesternHorz => 0b0100,
            CaptionFormat::FhdHorz => 0b0110,
            CaptionFormat::FhdVert => 0b0111,
            CaptionFormat::QhdHorz => 0b1000,
            CaptionFormat::QhdVert => 0b1001,
            CaptionFormat::SdHorz => 0b1010,
            CaptionFormat::SdVert => 0b1011,
            CaptionFormat::HdHorz => 0b1100,
            CaptionFormat::HdVert => 0b1101,
            CaptionFormat::Unknown(v) => v & 0x0F,
        }
    }
}

/// 字幕の文字符号化方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaptionCharCode {
    /// 8単位符号。
    EightBit,
    /// UCSを用いる符号化方式。
    UCS,
    /// 予備。
    ///
    /// 内包する値は2ビットの値。
    Reserved(u8),
}

impl CaptionCharCode {
    /// 2ビットの値から`CaptionCharCode`を生成する。上位ビットは無視される。
    #[inline]
    pub fn new(value: u8) -> CaptionCharCode {
        match value & 0b11 {
            0b00 => CaptionCharCode::EightBit,
            0b01 => CaptionCharCode::UCS,
            v => CaptionCharCode::Reserved(v),
        }
    }

    /// 2ビットの値として返す。
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            CaptionCharCode::EightBit => 0b00,
            CaptionCharCode::UCS => 0b01,
            CaptionCharCode::Reserved(v) => v & 0b11,
        }
    }
}

/// 字幕のロールアップモード。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaptionRollupMode {
    /// 非ロールアップ。
    NonRollup,
    /// ロールアップ。
    Rollup,
    /// 予約。
    ///
    /// 内包する値は2ビットの値。
    Reserved(u8),
}

impl CaptionRollupMode {
    /// 2ビットの値から`CaptionRollupMode`を生成する。上位ビットは無視される。
    #[inline]
    pub fn new(value: u8) -> CaptionRollupMode {
        match value & 0b11 {
            0b00 => CaptionRollupMode::NonRollup,
            0b01 => CaptionRollupMode::Rollup,
            v => CaptionRollupMode::Reserved(v),
        }
    }

    /// 2ビットの値として返す。
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            CaptionRollupMode::NonRollup => 0b00,
            CaptionRollupMode::Rollup => 0b01,
            CaptionRollupMode::Reserved(v) => v & 0b11,
        }
    }
}

/// 字幕管理データにおける言語。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLanguage {
    /// 言語識別（3ビット）。
    pub language_tag: u8,

    /// 受信時の表示モード。
    pub dmf_recv: DisplayMode,
    /// 記録再生時の時の表示モード。
    pub dmf_playback: DisplayMode,
    /// 表示条件指定。
    ///
    /// [`CaptionLanguage::has_dc`]が`true`を返す場合にのみ存在する。
    pub dc: Option<u8>,
    /// 言語コード。
    pub lang_code: LangCode,
    /// 表示形式。
    pub format: CaptionFormat,
    /// 文字符号化方式。
    pub tcs: CaptionCharCode,
    /// ロールアップモード。
    pub rollup_mode: CaptionRollupMode,
}

impl CaptionLanguage {
    /// 表示モードが表示条件指定を伴うものであれば`true`を返す。
    #[inline]
    pub fn has_dc(&self) -> bool {
        self.dmf_recv == DisplayMode::MayDisplay && self.dmf_playback != DisplayMode::MayDisplay
    }

    fn read(data: &mut &[u8]) -> Option<CaptionLanguage> {
        if data.is_empty() {
            log::debug!("invalid CaptionLanguage");
            return None;
        }

        let language_tag = (data[0] & 0b11100000) >> 5;
        let dmf_recv = DisplayMode::new((data[0] & 0b00001100) >> 2);
        let dmf_playback = DisplayMode::new(data[0] & 0b00000011);
        *data = &data[1..];

        let mut lang = CaptionLanguage {
            language_tag,
            dmf_recv,
            dmf_playback,
            dc: None,
            lang_code: LangCode::JPN,
            format: CaptionFormat::StandardDensityHorz,
            tcs: CaptionCharCode::EightBit,
            rollup_mode: CaptionRollupMode::NonRollup,
        };

        if lang.has_dc() {
            let Some((&dc, rem)) = data.split_first() else {
                log::debug!("invalid CaptionLanguage::dc");
                return None;
            };
            lang.dc = Some(dc);
            *data = rem;
        }

        if data.len() < 4 {
            log::debug!("invalid CaptionLanguage::lang_code");
            return None;
        }

        lang.lang_code = LangCode([data[0], data[1], data[2]]);
        lang.format = CaptionFormat::new((data[3] & 0b11110000) >> 4);
        lang.tcs = CaptionCharCode::new((data[3] & 0b00001100) >> 2);
        lang.rollup_mode = CaptionRollupMode::new(data[3] & 0b00000011);
        *data = &data[4..];

        Some(lang)
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let language_tag = check_value("language_tag", self.language_tag as u64, 0b111)?;
        buf.push(
            ((language_tag as u8) << 5)
                | 0b00010000
                | (self.dmf_recv.bits() << 2)
                | self.dmf_playback.bits(),
        );
        if self.has_dc() {
            buf.push(self.dc.unwrap_or(0));
        }
        buf.extend_from_slice(&self.lang_code.0);
        buf.push((self.format.bits() << 4) | (self.tcs.bits() << 2) | self.rollup_mode.bits());
        Ok(())
    }
}

/// 字幕管理データ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionManagement<'a> {
    /// 字幕のグループ。
    pub group: CaptionGroup,

    /// 時刻制御モード。
    pub tmd: TimeControlMode,

    /// オフセット時刻（単位はミリ秒）。
    ///
    /// `tmd`が[`TimeControlMode::OffsetTime`]の場合にのみ存在する。
    /// 伝送上は時分秒とミリ秒をBCDで表した5バイト（36ビットの時刻と4ビットの予約）で、
    /// 表せる値は99時間59分59.999秒までである。
    pub otm: Option<u32>,

    /// 言語。
    pub languages: Vec<CaptionLanguage>,

    /// データユニット。
    pub data_units: Vec<DataUnit<'a>>,
}

impl<'a> CaptionManagement<'a> {
    /// `data`から`CaptionManagement`を読み取る。
    pub fn read(group: CaptionGroup, data: &'a [u8]) -> Option<CaptionManagement<'a>> {
        if data.is_empty() {
            log::debug!("invalid CaptionManagement");
            return None;
        }

        let tmd = TimeControlMode::from_bits((data[0] & 0b11000000) >> 6);
        let mut data = &data[1..];

        let otm = if tmd == TimeControlMode::OffsetTime {
            if data.len() < 5 {
                log::debug!("invalid CaptionManagement::OTM");
                return None;
            }

            let otm = data[0..=4].read_bcd_milli();
            data = &data[5..];

            Some(otm)
        } else {
            None
        };

        let Some((&num_languages, mut data)) = data.split_first() else {
            log::debug!("invalid CaptionManagement::num_languages");
            return None;
        };

        let mut languages = Vec::with_capacity(num_languages as usize);
        for _ in 0..num_languages {
            languages.push(CaptionLanguage::read(&mut data)?);
        }

        let (data_units, _) = DataUnit::read(data)?;
        Some(CaptionManagement {
            group,
            tmd,
            otm,
            languages,
            data_units,
        })
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        buf.push((self.tmd.bits() << 6) | 0b00111111);
        if self.tmd == TimeControlMode::OffsetTime {
            let otm = check_value("otm", self.otm.unwrap_or(0) as u64, MAX_BCD_MILLI as u64)?;
            buf.put_bcd_milli(otm as u32);
        }

        let num_languages = check_len("num_languages", self.languages.len(), 0xFF)?;
        buf.push(num_languages as u8);
        for lang in &self.languages {
            lang.write(buf)?;
        }

        DataUnit::write(&self.data_units, buf)
    }
}

/// 字幕文データ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionStatement<'a> {
    /// 字幕のグループ。
    pub group: CaptionGroup,

    /// 言語番号で、`0..=7`の範囲である。
    ///
    /// 字幕管理データにおける[`CaptionLanguage::language_tag`]に対応する。
    pub language_index: u8,

    /// 時刻制御モード。
    pub tmd: TimeControlMode,

    /// 提示開始時刻（単位はミリ秒）。
    ///
    /// `tmd`が[`TimeControlMode::RealTime`]か[`TimeControlMode::OffsetTime`]の場合にのみ存在する。
    /// [`CaptionManagement::otm`]と同じく5バイトのBCDで伝送される。
    pub stm: Option<u32>,

    /// データユニット。
    pub data_units: Vec<DataUnit<'a>>,
}

impl<'a> CaptionStatement<'a> {
    /// `data`から`CaptionStatement`を読み取る。
    pub fn read(
        group: CaptionGroup,
        language_index: u8,
        data: &'a [u8],
    ) -> Option<CaptionStatement<'a>> {
        if data.is_empty() {
            log::debug!("invalid CaptionStatement");
            return None;
        }

        let tmd = TimeControlMode::from_bits((data[0] & 0b11000000) >> 6);
        let mut data = &data[1..];

        let stm = if has_stm(tmd) {
            if data.len() < 5 {
                log::debug!("invalid CaptionStatement::STM");
                return None;
            }

            let stm = data[0..=4].read_bcd_milli();
            data = &data[5..];

            Some(stm)
        } else {
            None
        };

        let (data_units, _) = DataUnit::read(data)?;

        Some(CaptionStatement {
            group,
            language_index,
            tmd,
            stm,
            data_units,
        })
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        check_value("language_index", self.language_index as u64, 0b111)?;

        buf.push((self.tmd.bits() << 6) | 0b00111111);
        if has_stm(self.tmd) {
            let stm = check_value("stm", self.stm.unwrap_or(0) as u64, MAX_BCD_MILLI as u64)?;
            buf.put_bcd_milli(stm as u32);
        }

        DataUnit::write(&self.data_units, buf)
    }
}

#[inline]
fn check_value(name: &'static str, value: u64, max: u64) -> Result<u64, EncodeError> {
    if value > max {
        return Err(EncodeError::OutOfRange { name, value, max });
    }
    Ok(value)
}

#[inline]
fn check_len(name: &'static str, len: usize, max: u64) -> Result<u64, EncodeError> {
    check_value(name, len as u64, max)
}

#[inline]
fn has_stm(tmd: TimeControlMode) -> bool {
    matches!(tmd, TimeControlMode::RealTime | TimeControlMode::OffsetTime)
}

/// データグループで伝送される字幕データ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionData<'a> {
    /// 字幕管理データ。
    Management(CaptionManagement<'a>),
    /// 字幕文データ。
    Statement(CaptionStatement<'a>),
}

impl<'a> CaptionData<'a> {
    /// 独立PESのdata_identifierに続くデータから`CaptionData`を読み取る。
    ///
    /// PESデータパケットヘッダを読み飛ばし、その後のデータグループを読み取る。
    pub fn read(payload: &'a [u8]) -> Option<CaptionData<'a>> {
        if payload.len() < 2 {
            log::debug!("invalid CaptionData");
            return None;
        }
        if payload[0] != 0xFF {
            log::debug!("invalid CaptionData::private_stream_id");
            return None;
        }

        // PES_data_packet_header_length
        let header_length = payload[1] & 0b00001111;
        let Some((_, data)) = payload[2..].split_at_checked(header_length as usize) else {
            log::debug!("invalid CaptionData::private_data");
            return None;
        };

        let data_group = DataGroup::read(data)?;
        let group = if data_group.data_group_id & 0x20 == 0 {
            CaptionGroup::A
        } else {
            CaptionGroup::B
        };
        match data_group.data_group_id & 0x1F {
            0 => CaptionManagement::read(group, data_group.data_group_data)
                .map(CaptionData::Management),
            id @ 1..=8 => CaptionStatement::read(group, id - 1, data_group.data_group_data)
                .map(CaptionData::Statement),
            _ => {
                log::debug!("invalid DataGroup::data_group_id");
                None
            }
        }
    }

    /// データグループID。
    pub fn data_group_id(&self) -> u8 {
        let (group, id) = match self {
            CaptionData::Management(m) => (m.group, 0),
            CaptionData::Statement(s) => (s.group, (s.language_index & 0b111) + 1),
        };
        match group {
            CaptionGroup::A => id,
            CaptionGroup::B => 0x20 | id,
        }
    }

    /// `CaptionData`を独立PESのdata_identifierに続くデータとしてバイト列に変換する。
    ///
    /// 時刻や表示条件指定など条件付きで存在するフィールドは、条件を満たす場合にのみ書き込まれ、
    /// 値がない場合は`0`として書き込まれる。
    /// 長さや個数が各フィールドで表せる範囲を超える場合はエラーを返す。
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut data_group_data = Vec::new();
        match self {
            CaptionData::Management(m) => m.write(&mut data_group_data)?,
            CaptionData::Statement(s) => s.write(&mut data_group_data)?,
        }

        // private_stream_id、PES_data_packet_header_length（0）
        let mut buf = vec![0xFF, 0xF0];
        DataGroup {
            data_group_id: self.data_group_id(),
            data_group_version: 0,
            data_group_link_number: 0,
            last_data_group_link_number: 0,
            data_group_data: &data_group_data,
        }
        .write(&mut buf)?;
        Ok(buf)
    }
}

/// データユニット。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataUnit<'a> {
    /// 字幕本文。
    StatementBody(&'a [u8]),

    /// 1バイトDRCS。
    DrcsSb(&'a [u8]),

    /// 2バイトDRCS。
    DrcsDb(&'a [u8]),

    /// ビットマップ。
    Bitmap(&'a [u8]),
}

impl<'a> DataUnit<'a> {
    /// データユニットパラメータ。
    pub fn parameter(&self) -> u8 {
        match self {
            DataUnit::StatementBody(_) => 0x20,
            DataUnit::DrcsSb(_) => 0x30,
            DataUnit::DrcsDb(_) => 0x31,
            DataUnit::Bitmap(_) => 0x35,
        }
    }

    /// データユニットのデータ。
    pub fn data(&self) -> &'a [u8] {
        match *self {
            DataUnit::StatementBody(data)
            | DataUnit::DrcsSb(data)
            | DataUnit::DrcsDb(data)
            | DataUnit::Bitmap(data) => data,
        }
    }

    /// `data`から`DataUnit`を読み取る。
    ///
    /// 戻り値は`Vec<DataUnit>`と、それを読み取ったあとの残りのバイト列である。
    /// 未対応のデータユニットは読み飛ばされる。
    pub fn read(data: &'a [u8]) -> Option<(Vec<DataUnit<'a>>, &'a [u8])> {
        if data.len() < 3 {
            log::debug!("invalid DataUnit::data_unit_loop_length");
            return None;
        }

        let data_unit_loop_length = data[0..=2].read_be_24();
        let Some((mut data, rem)) = data[3..].split_at_checked(data_unit_loop_length as usize)
        else {
            log::debug!("invalid DataUnit::data_units");
            return None;
        };

        let mut data_units = Vec::new();
        while !data.is_empty() {
            if data.len() < 5 {
                log::debug!("invalid DataUnit");
                return None;
            }

            let unit_separator = data[0];
            if unit_separator != 0x1F {
                log::debug!("invalid DataUnit::unit_separator");
                return None;
            }

            let data_unit_parameter = data[1];
            let data_unit_size = data[2..=4].read_be_24();
            let Some((data_unit_data, rem)) = data[5..].split_at_checked(data_unit_size as usize)
            else {
                log::debug!("invalid DataUnit::data_unit_data");
                return None;
            };
            data = rem;

            let data_unit = match data_unit_parameter {
                // 本文
                0x20 => DataUnit::StatementBody(data_unit_data),
                // 1バイトDRCS
                0x30 => DataUnit::DrcsSb(data_unit_data),
                // 2バイトDRCS
                0x31 => DataUnit::DrcsDb(data_unit_data),
                // ビットマップ
                0x35 => DataUnit::Bitmap(data_unit_data),
                p => {
                    log::trace!("unsupported DataUnit::data_unit_parameter: {:02X}", p);
                    continue;
                }
            };
            data_units.push(data_unit);
        }

        Some((data_units, rem))
    }

    /// データユニットのループをデータユニットループ長と共に`buf`に書き込む。
    pub fn write(data_units: &[DataUnit], buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let len: usize = data_units.iter().map(|du| 5 + du.data().len()).sum();
        let len = check_len("data_unit_loop_length", len, 0xFF_FFFF)?;
        buf.put_be_24(len as u32);
        for du in data_units {
            buf.push(0x1F);
            buf.push(du.parameter());
            buf.put_be_24(du.data().len() as u32);
            buf.extend_from_slice(du.data());
        }
        Ok(())
    }
}
