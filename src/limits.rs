/// メディアタイプキャッシュの制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLimits {
    /// 1 つのキャッシュに保持する最大エントリ数 (デフォルト: 200)
    ///
    /// 文字列からの変換と文字列への変換はそれぞれ別のキャッシュを持ち、
    /// どちらにもこの上限が適用されます。
    pub max_entries: usize,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self { max_entries: 200 }
    }
}

impl CacheLimits {
    /// 制限なしの設定を作成
    pub fn unlimited() -> Self {
        Self {
            max_entries: usize::MAX,
        }
    }

    /// キャッシュを無効にする設定を作成
    pub fn disabled() -> Self {
        Self { max_entries: 0 }
    }
}
