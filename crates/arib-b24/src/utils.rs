/// バイト列用拡張トレイト。
pub trait BytesExt {
    /// ビッグエンディアンで16ビット符号無し整数を読み込む。
    ///
    /// 事前に長さが2以上あると分かるようなコードであれば最適化が期待できる。
    fn read_be_16(&self) -> u16;

    /// ビッグエンディアンで24ビット符号無し整数を読み込む。
    fn read_be_24(&self) -> u32;

    /// BCDで符号化された時分秒とミリ秒（`hh mm ss m mm`の5バイト）をミリ秒として読み込む。
    fn read_bcd_milli(&self) -> u32;
}

impl BytesExt for [u8] {
    #[inline]
    fn read_be_16(&self) -> u16 {
        u16::from_be_bytes([self[0], self[1]])
    }

    #[inline]
    fn read_be_24(&self) -> u32 {
        ((self[0] as u32) << 16) | ((self[1] as u32) << 8) | (self[2] as u32)
    }

    fn read_bcd_milli(&self) -> u32 {
        #[inline]
        fn bcd(b: u8) -> u32 {
            ((b >> 4) as u32) * 10 + ((b & 0x0F) as u32)
        }

        let hour = bcd(self[0]);
        let minute = bcd(self[1]);
        let second = bcd(self[2]);
        let milli = ((self[3] >> 4) as u32) * 100 + ((self[3] & 0x0F) as u32) * 10 + (self[4] >> 4) as u32;
        ((hour * 60 + minute) * 60 + second) * 1000 + milli
    }
}

/// BCDの時分秒とミリ秒で表せる最大のミリ秒（99:59:59.999）。
pub const MAX_BCD_MILLI: u32 = 100 * 60 * 60 * 1000 - 1;

/// 書き込み用拡張トレイト。
pub trait BufExt {
    /// ビッグエンディアンで16ビット符号無し整数を書き込む。
    fn put_be_16(&mut self, n: u16);

    /// ビッグエンディアンで24ビット符号無し整数の下位24ビットを書き込む。
    fn put_be_24(&mut self, n: u32);

    /// ミリ秒をBCDで符号化された時分秒とミリ秒（5バイト）として書き込む。
    ///
    /// 最後の4ビットは予約ビットとして1で埋める。
    /// `ms`は[`MAX_BCD_MILLI`]以下でなければならず、超えた分の時は切り捨てられる。
    fn put_bcd_milli(&mut self, ms: u32);
}

impl BufExt for Vec<u8> {
    #[inline]
    fn put_be_16(&mut self, n: u16) {
        self.extend_from_slice(&n.to_be_bytes());
    }

    #[inline]
    fn put_be_24(&mut self, n: u32) {
        self.extend_from_slice(&n.to_be_bytes()[1..]);
    }

    fn put_bcd_milli(&mut self, ms: u32) {
        #[inline]
        fn bcd(n: u32) -> u8 {
            (((n / 10) % 10) << 4) as u8 | (n % 10) as u8
        }

        let milli = ms % 1000;
        let second = (ms / 1000) % 60;
        let minute = (ms / 60_000) % 60;
        let hour = ms / 3_600_000;
        self.extend_from_slice(&[
            bcd(hour),
            bcd(minute),
            bcd(second),
            (((milli / 100) << 4) as u8) | ((milli / 10) % 10) as u8,
            (((milli % 10) << 4) as u8) | 0x0F,
        ]);
    }
}

/// 要素数`N`のヒープに確保される配列を、`f`を呼び出した戻り値で生成する。
pub fn boxed_array<T, const N: usize, F>(f: F) -> Box<[T; N]>
where
    F: FnMut(usize) -> T,
{
    let slice = (0..N).map(f).collect::<Vec<T>>().into_boxed_slice();

    // Safety: 要素数の分かっている`Box<[T]>`から`Box<[T; N]>`への変換でしかない
    unsafe { Box::from_raw(Box::into_raw(slice) as *mut [T; N]) }
}
