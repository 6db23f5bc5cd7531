//! 字幕で伝送されるDRCS（外字）のパターン。

use crate::token::DrcsChar;
use crate::utils::BytesExt;

/// DRCSデータ構造。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drcs<'a> {
    /// 外字符号ごとのデータ。
    pub codes: Vec<DrcsCode<'a>>,
}

impl<'a> Drcs<'a> {
    /// [`DataUnit::DrcsSb`][crate::pes::caption::DataUnit::DrcsSb]や
    /// [`DataUnit::DrcsDb`][crate::pes::caption::DataUnit::DrcsDb]の
    /// データから`Drcs`を読み取る。
    pub fn read(data: &'a [u8]) -> Option<Drcs<'a>> {
        let Some((&number_of_code, mut data)) = data.split_first() else {
            log::debug!("invalid Drcs::NumberOfCode");
            return None;
        };

        let mut codes = Vec::with_capacity(number_of_code as usize);
        for _ in 0..number_of_code {
            if data.len() < 3 {
                log::debug!("invalid DrcsCode");
                return None;
            }

            let character_code = data[0..=1].read_be_16();
            let number_of_font = data[2];
            data = &data[3..];

            let mut fonts = Vec::with_capacity(number_of_font as usize);
            for _ in 0..number_of_font {
                fonts.push(DrcsFont::read(&mut data)?);
            }

            codes.push(DrcsCode {
                character_code,
                fonts,
            });
        }

        Some(Drcs { codes })
    }
}

/// 外字符号ごとのDRCS。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrcsCode<'a> {
    /// 外字符号。
    ///
    /// 1バイトDRCSでは上位バイトが`0x41..=0x4F`の終端文字、下位バイトが符号となる。
    pub character_code: u16,

    /// フォントごとのデータ。
    pub fonts: Vec<DrcsFont<'a>>,
}

impl<'a> DrcsCode<'a> {
    /// 外字符号に対応する[`DrcsChar`]を返す。
    ///
    /// `two_byte`には2バイトDRCSのデータユニットで伝送された場合に`true`を指定する。
    /// 1バイトDRCSの外字符号が不正な場合は`None`を返す。
    pub fn drcs_char(&self, two_byte: bool) -> Option<DrcsChar> {
        if two_byte {
            return Some(DrcsChar {
                set: 0,
                code: self.character_code,
            });
        }

        let [f, code] = self.character_code.to_be_bytes();
        match f {
            0x41..=0x4F => Some(DrcsChar {
                set: f - 0x40,
                code: code as u16,
            }),
            _ => None,
        }
    }
}

/// フォントごとのDRCS。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrcsFont<'a> {
    /// フォント識別（4ビット）。
    pub font_id: u8,

    /// パターンのデータ。
    pub data: DrcsFontData<'a>,
}

impl<'a> DrcsFont<'a> {
    fn read(data: &mut &'a [u8]) -> Option<DrcsFont<'a>> {
        let Some((&b, rem)) = data.split_first() else {
            log::debug!("invalid DrcsFont");
            return None;
        };
        let font_id = (b & 0b11110000) >> 4;
        let mode = b & 0b00001111;

        let font_data = match mode {
            0b0000 | 0b0001 => {
                if rem.len() < 3 {
                    log::debug!("invalid DrcsUncompressedData");
                    return None;
                }

                let mut pattern = DrcsUncompressedData {
                    mode,
                    depth: rem[0],
                    width: rem[1],
                    height: rem[2],
                    pattern_data: &[],
                };
                let len = pattern.pattern_len();
                let Some(pattern_data) = rem[3..].get(..len) else {
                    log::debug!("invalid DrcsUncompressedData::patternData");
                    return None;
                };
                pattern.pattern_data = pattern_data;
                *data = &rem[3 + len..];

                DrcsFontData::Uncompressed(pattern)
            }
            _ => {
                if rem.len() < 4 {
                    log::debug!("invalid DrcsGeometricData");
                    return None;
                }

                let region_x = rem[0];
                let region_y = rem[1];
                let geometric_data_length = rem[2..=3].read_be_16() as usize;
                let Some(geometric_data) = rem[4..].get(..geometric_data_length) else {
                    log::debug!("invalid DrcsGeometricData::geometricData");
                    return None;
                };
                *data = &rem[4 + geometric_data_length..];

                DrcsFontData::Geometric(DrcsGeometricData {
                    mode,
                    region_x,
                    region_y,
                    geometric_data,
                })
            }
        };

        Some(DrcsFont {
            font_id,
            data: font_data,
        })
    }
}

/// DRCSのパターンデータ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrcsFontData<'a> {
    /// 圧縮されていないパターン。
    Uncompressed(DrcsUncompressedData<'a>),
    /// ジオメトリック図形で表されたパターン。
    Geometric(DrcsGeometricData<'a>),
}

impl<'a> DrcsFontData<'a> {
    /// 圧縮されていないパターンであれば返す。
    #[inline]
    pub fn uncompressed(&self) -> Option<&DrcsUncompressedData<'a>> {
        match self {
            DrcsFontData::Uncompressed(data) => Some(data),
            DrcsFontData::Geometric(_) => None,
        }
    }
}

/// 圧縮されていないDRCSのパターン。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrcsUncompressedData<'a> {
    /// 符号化モード。`0`は2階調、`1`は多階調。
    pub mode: u8,
    /// 階調数から2を引いた値。
    pub depth: u8,
    /// 横方向のドット数。
    pub width: u8,
    /// 縦方向のドット数。
    pub height: u8,
    /// 左上から横方向に詰められた画素のデータ。
    pub pattern_data: &'a [u8],
}

impl DrcsUncompressedData<'_> {
    /// 1画素あたりのビット数。
    pub fn bits_per_pixel(&self) -> u32 {
        if self.mode == 0 {
            return 1;
        }

        // ceil(log2(depth + 2))
        let levels = self.depth as u32 + 2;
        u32::BITS - (levels - 1).leading_zeros()
    }

    fn pattern_len(&self) -> usize {
        let bits = self.width as usize * self.height as usize * self.bits_per_pixel() as usize;
        (bits + 7) / 8
    }

    /// (`x`, `y`)の画素の階調を返す。範囲外の場合は`None`を返す。
    pub fn pixel(&self, x: u8, y: u8) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let bpp = self.bits_per_pixel() as usize;
        let p = (y as usize * self.width as usize + x as usize) * bpp;
        let mut value = 0;
        for bit in p..p + bpp {
            let b = self.pattern_data.get(bit / 8)?;
            value = (value << 1) | ((b >> (7 - bit % 8)) & 1);
        }
        Some(value)
    }
}

/// ジオメトリック図形で表されたDRCSのパターン。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrcsGeometricData<'a> {
    /// 符号化モード。
    pub mode: u8,
    /// 横方向の領域。
    pub region_x: u8,
    /// 縦方向の領域。
    pub region_y: u8,
    /// ジオメトリックデータ。
    pub geometric_data: &'a [u8],
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use hex_literal::hex;

    use super::*;

    #[test]
    fn test_read_two_level() {
        // 4x2の2階調パターン
        let data = hex!("01 4121 01 00 00 04 02 9F");
        let drcs = Drcs::read(&data).unwrap();
        assert_eq!(drcs.codes.len(), 1);

        let code = &drcs.codes[0];
        assert_eq!(code.character_code, 0x4121);
        assert_eq!(code.drcs_char(false), Some(DrcsChar { set: 1, code: 0x21 }));

        let pattern = code.fonts[0].data.uncompressed().unwrap();
        assert_eq!(pattern.bits_per_pixel(), 1);
        assert_eq!(pattern.pattern_data, [0x9F]);
        let row0: Vec<_> = (0..4).map(|x| pattern.pixel(x, 0).unwrap()).collect();
        let row1: Vec<_> = (0..4).map(|x| pattern.pixel(x, 1).unwrap()).collect();
        assert_eq!(row0, [1, 0, 0, 1]);
        assert_eq!(row1, [1, 1, 1, 1]);
        assert_eq!(pattern.pixel(4, 0), None);
        assert_eq!(pattern.pixel(0, 2), None);
    }

    #[test]
    fn test_read_multi_level() {
        // 2x2の4階調パターンが2文字
        let data = hex!(
            "02"
            "2122 01 01 02 02 02 1B"
            "2123 02 01 02 02 02 E4 12 08 08 0000"
        );
        let drcs = Drcs::read(&data).unwrap();
        assert_eq!(drcs.codes.len(), 2);

        let code = &drcs.codes[0];
        assert_eq!(code.drcs_char(true), Some(DrcsChar { set: 0, code: 0x2122 }));
        let pattern = code.fonts[0].data.uncompressed().unwrap();
        assert_eq!(pattern.bits_per_pixel(), 2);
        assert_eq!(pattern.pixel(0, 0), Some(0));
        assert_eq!(pattern.pixel(1, 0), Some(1));
        assert_eq!(pattern.pixel(0, 1), Some(2));
        assert_eq!(pattern.pixel(1, 1), Some(3));

        let code = &drcs.codes[1];
        assert_eq!(code.fonts.len(), 2);
        assert_eq!(code.fonts[1].font_id, 1);
        assert_matches!(&code.fonts[1].data, DrcsFontData::Geometric(g) => {
            assert_eq!(g.mode, 2);
            assert_eq!((g.region_x, g.region_y), (8, 8));
            assert!(g.geometric_data.is_empty());
        });
    }

    #[test]
    fn test_invalid() {
        assert_eq!(Drcs::read(&[]), None);
        // パターンデータが足りない
        assert_eq!(Drcs::read(&hex!("01 4121 01 00 00 10 10 00")), None);
        // 不正な1バイトDRCSの外字符号
        let drcs = Drcs::read(&hex!("01 2121 00")).unwrap();
        assert_eq!(drcs.codes[0].drcs_char(false), None);
    }
}
