//! q 値による重み付けと順位付け
//!
//! ## 概要
//!
//! Accept 系ヘッダーの各要素を `q` パラメータの値で重み付けし、
//! 重みの降順に並べます。
//!
//! - `q` がない場合の重みは 1.0
//! - 同じ重みの要素は元の順序を保ちます (安定ソート)
//! - 等しい要素は最初 (最も順位の高いもの) だけを残します
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::weighted::{Weighted, rank_by};
//!
//! let ranked = rank_by("gzip;q=0.5, br, deflate;q=0.8", |item| {
//!     let name = item.split(';').next().unwrap_or_default().trim().to_string();
//!     Weighted::from_parameters(name, &Weighted::<String>::parse_parameters(item))
//! })
//! .unwrap();
//! assert_eq!(ranked, ["br", "deflate", "gzip"]);
//! ```

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::HeaderError;
use crate::token::{ParameterMap, parse_parameters};

/// デフォルトの重み
pub const DEFAULT_WEIGHT: f32 = 1.0;

/// 重み付きの値
#[derive(Debug, Clone, PartialEq)]
pub struct Weighted<T> {
    value: T,
    weight: f32,
}

impl<T> Weighted<T> {
    /// デフォルトの重みで作成
    pub fn new(value: T) -> Self {
        Self {
            value,
            weight: DEFAULT_WEIGHT,
        }
    }

    /// 重みを指定して作成
    pub fn with_weight(value: T, weight: f32) -> Self {
        Self { value, weight }
    }

    /// パラメータの `q` から重みを決めて作成
    ///
    /// # エラー
    ///
    /// - `q` が数値でない場合は [`HeaderError::InvalidWeight`]
    /// - `q` が 1.0 を超える場合は [`HeaderError::WeightOutOfRange`]
    pub fn from_parameters(value: T, params: &ParameterMap) -> Result<Self, HeaderError> {
        Self::from_q(value, params.get("q"))
    }

    /// `q` の値から重みを決めて作成
    ///
    /// `q` が `None` の場合はデフォルトの重みになります。
    pub fn from_q(value: T, q: Option<&str>) -> Result<Self, HeaderError> {
        let Some(q) = q else {
            return Ok(Self::new(value));
        };

        let weight = q
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|w| !w.is_nan())
            .ok_or_else(|| HeaderError::InvalidWeight {
                value: q.to_string(),
            })?;
        if weight > 1.0 {
            return Err(HeaderError::WeightOutOfRange {
                value: q.to_string(),
            });
        }

        Ok(Self { value, weight })
    }

    /// 最初の `;` 以降をパラメータとしてパース
    ///
    /// `;` がない場合は空のマップを返します。
    pub fn parse_parameters(input: &str) -> ParameterMap {
        match input.find(';') {
            Some(index) => parse_parameters(&input[index..], ';'),
            None => ParameterMap::new(),
        }
    }

    /// 値を取得
    pub fn value(&self) -> &T {
        &self.value
    }

    /// 重みを取得
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// 値を取り出す
    pub fn into_value(self) -> T {
        self.value
    }
}

/// 重みの降順に並べて値を返す
///
/// 同じ重みの値は元の順序を保ちます。等しい値は最初のものだけを残します。
pub fn rank<T: Eq + Hash>(items: impl IntoIterator<Item = Weighted<T>>) -> Vec<T> {
    let mut items: Vec<Weighted<T>> = items.into_iter().collect();
    items.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let keep: Vec<bool> = {
        let mut seen: HashSet<&T> = HashSet::with_capacity(items.len());
        items.iter().map(|item| seen.insert(&item.value)).collect()
    };
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item.value))
        .collect()
}

/// カンマ区切りのヘッダー値を要素ごとにパースして順位付けする
///
/// 各要素は前後の空白を除いて `parse` に渡されます。空の要素は無視します。
pub fn rank_by<T, F>(input: &str, mut parse: F) -> Result<Vec<T>, HeaderError>
where
    T: Eq + Hash,
    F: FnMut(&str) -> Result<Weighted<T>, HeaderError>,
{
    let items = input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(&mut parse)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rank(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_item(item: &str) -> Result<Weighted<String>, HeaderError> {
        let name = item.split(';').next().unwrap_or_default().trim().to_string();
        Weighted::from_parameters(name, &Weighted::<String>::parse_parameters(item))
    }

    #[test]
    fn test_default_weight() {
        let w = Weighted::new("a");
        assert_eq!(w.weight(), 1.0);
        assert_eq!(*w.value(), "a");

        let w = parse_item("a;level=1").unwrap();
        assert_eq!(w.weight(), 1.0);

        // 値のない q はデフォルトの重み
        let w = parse_item("a;q").unwrap();
        assert_eq!(w.weight(), 1.0);
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_item("a;q=0.5").unwrap().weight(), 0.5);
        assert_eq!(parse_item("a; q=\"0.25\"").unwrap().weight(), 0.25);
        assert_eq!(parse_item("a;q=1").unwrap().weight(), 1.0);
        assert_eq!(parse_item("a;q=0").unwrap().weight(), 0.0);
    }

    #[test]
    fn test_invalid_weight() {
        assert_eq!(
            parse_item("a;q=abc"),
            Err(HeaderError::InvalidWeight {
                value: "abc".to_string()
            })
        );
        assert!(matches!(
            parse_item("a;q=NaN"),
            Err(HeaderError::InvalidWeight { .. })
        ));
        assert_eq!(
            parse_item("a;q=1.5"),
            Err(HeaderError::WeightOutOfRange {
                value: "1.5".to_string()
            })
        );
    }

    #[test]
    fn test_parse_parameters() {
        let params = Weighted::<()>::parse_parameters("en-US;q=0.8;x=y");
        assert_eq!(params.get("q"), Some("0.8"));
        assert_eq!(params.get("x"), Some("y"));
        assert!(!params.contains("en-US"));

        assert!(Weighted::<()>::parse_parameters("en-US").is_empty());
    }

    #[test]
    fn test_rank_stable() {
        let ranked = rank(vec![
            Weighted::with_weight("a", 0.5),
            Weighted::with_weight("b", 1.0),
            Weighted::with_weight("c", 0.5),
            Weighted::with_weight("d", 1.0),
        ]);
        assert_eq!(ranked, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_rank_dedup_keeps_highest() {
        let ranked = rank(vec![
            Weighted::with_weight("a", 0.1),
            Weighted::with_weight("b", 0.5),
            Weighted::with_weight("a", 0.9),
        ]);
        assert_eq!(ranked, vec!["a", "b"]);
    }

    #[test]
    fn test_rank_many_duplicates() {
        // 重複の多い大きな入力でも最初の出現だけが残る
        let items = (0..20_000).map(|i| {
            let weight = if i % 2 == 0 { 0.5 } else { 1.0 };
            Weighted::with_weight(format!("v{}", i % 100), weight)
        });
        let ranked = rank(items);
        assert_eq!(ranked.len(), 100);
        assert_eq!(ranked[0], "v1");
        assert_eq!(ranked[49], "v99");
        assert_eq!(ranked[50], "v0");
        assert_eq!(ranked[99], "v98");

        let header = (0..5_000)
            .map(|i| format!("e{};q=0.{}", i % 10, i % 10))
            .collect::<Vec<_>>()
            .join(", ");
        let ranked = rank_by(&header, parse_item).unwrap();
        assert_eq!(
            ranked,
            vec!["e9", "e8", "e7", "e6", "e5", "e4", "e3", "e2", "e1", "e0"]
        );
    }

    #[test]
    fn test_rank_by() {
        let ranked = rank_by("x;q=0.1, y, , z;q=0.7", parse_item).unwrap();
        assert_eq!(ranked, vec!["y", "z", "x"]);

        assert!(rank_by("", parse_item).unwrap().is_empty());
        assert!(matches!(
            rank_by("x, y;q=2", parse_item),
            Err(HeaderError::WeightOutOfRange { .. })
        ));
    }
}
