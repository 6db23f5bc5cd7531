//! PES用のモジュール。

pub mod caption;
pub mod drcs;

/// 独立PESで伝送されるデータの種類（data_identifier）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PesTag {
    /// 字幕。
    Caption,
    /// 文字スーパー。
    Superimpose,
}

impl PesTag {
    /// data_identifierの値から`PesTag`を得る。
    #[inline]
    pub fn from_data_identifier(value: u8) -> Option<PesTag> {
        match value {
            0x80 => Some(PesTag::Caption),
            0x81 => Some(PesTag::Superimpose),
            _ => None,
        }
    }

    /// data_identifierの値。
    #[inline]
    pub fn data_identifier(self) -> u8 {
        match self {
            PesTag::Caption => 0x80,
            PesTag::Superimpose => 0x81,
        }
    }
}

/// ARIB STD-B24第三編で規定される独立PES。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndependentPes<'a> {
    /// データの種類。
    pub tag: PesTag,

    /// data_identifierに続くデータ。
    ///
    /// [`caption::CaptionData::read`]で読み取ることができる。
    pub payload: &'a [u8],
}

impl<'a> IndependentPes<'a> {
    /// `data`から`IndependentPes`を読み取る。
    pub fn read(data: &'a [u8]) -> Option<IndependentPes<'a>> {
        let Some((&data_identifier, payload)) = data.split_first() else {
            log::debug!("invalid IndependentPes");
            return None;
        };

        let Some(tag) = PesTag::from_data_identifier(data_identifier) else {
            log::debug!("invalid IndependentPes::data_identifier");
            return None;
        };

        Some(IndependentPes { tag, payload })
    }

    /// `IndependentPes`をバイト列に変換する。
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + self.payload.len());
        buf.push(self.tag.data_identifier());
        buf.extend_from_slice(self.payload);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_pes() {
        let pes = IndependentPes::read(&[0x80, 0xFF, 0xF0]).unwrap();
        assert_eq!(pes.tag, PesTag::Caption);
        assert_eq!(pes.payload, [0xFF, 0xF0]);
        assert_eq!(pes.to_bytes(), [0x80, 0xFF, 0xF0]);

        let pes = IndependentPes::read(&[0x81]).unwrap();
        assert_eq!(pes.tag, PesTag::Superimpose);
        assert!(pes.payload.is_empty());

        assert_eq!(IndependentPes::read(&[]), None);
        assert_eq!(IndependentPes::read(&[0x82, 0xFF]), None);
    }

    #[test]
    fn test_round_trip() {
        for tag in [PesTag::Caption, PesTag::Superimpose] {
            for payload in [&[][..], &[0xFF, 0xF0, 0x00][..]] {
                let pes = IndependentPes { tag, payload };
                assert_eq!(IndependentPes::read(&pes.to_bytes()), Some(pes));
            }
        }
    }
}
