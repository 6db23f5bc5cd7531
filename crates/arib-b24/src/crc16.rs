//! データグループで使用されるCRC16。

/// CRC-16/CCITT（生成多項式`0x1021`、初期値`0`）の計算表。
static TABLE: [u16; 256] = {
    let mut table = [0; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// `data`のCRC16を計算する。
///
/// 末尾にCRC16を含めたデータを渡した場合、データが正しければ`0`を返す。
pub fn calc(data: &[u8]) -> u16 {
    data.iter().fold(0, |crc, &b| {
        (crc << 8) ^ TABLE[(((crc >> 8) as u8) ^ b) as usize]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc() {
        assert_eq!(calc(b""), 0x0000);
        // CRC-16/XMODEMのチェック値
        assert_eq!(calc(b"123456789"), 0x31C3);

        let mut data = b"123456789".to_vec();
        data.extend_from_slice(&0x31C3_u16.to_be_bytes());
        assert_eq!(calc(&data), 0);
    }
}
