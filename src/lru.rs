//! 容量上限付きの LRU マップ
//!
//! エントリはスロット配列上の双方向リストで管理し、参照・挿入・追い出しはすべて O(1) です。
//! 満杯のときは最も長く参照されていないエントリのスロットを再利用します。

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU マップ
#[derive(Debug)]
pub struct LruMap<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Slot<K, V>>,
    /// 最も最近使われたエントリ
    head: Option<usize>,
    /// 最も長く使われていないエントリ
    tail: Option<usize>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruMap<K, V> {
    /// 最大 `capacity` 個のエントリを保持するマップを作成
    ///
    /// `capacity` が 0 の場合は何も保持しません。
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// 値を取得し、そのエントリを最も最近使われたものにする
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.touch(idx);
        Some(&self.slots[idx].value)
    }

    /// 順序を変えずに値を取得
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&idx| &self.slots[idx].value)
    }

    /// キーが存在するか (順序は変えない)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// 値を挿入
    ///
    /// 満杯で新しいキーを挿入した場合は、追い出したエントリを返します。
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&idx) = self.index.get(&key) {
            self.slots[idx].value = value;
            self.touch(idx);
            return None;
        }

        if self.slots.len() < self.capacity {
            let idx = self.slots.len();
            self.slots.push(Slot {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.index.insert(key, idx);
            self.push_front(idx);
            return None;
        }

        // 満杯なので末尾のスロットを再利用する
        let idx = self.tail?;
        self.detach(idx);
        let old_key = std::mem::replace(&mut self.slots[idx].key, key.clone());
        let old_value = std::mem::replace(&mut self.slots[idx].value, value);
        self.index.remove(&old_key);
        self.index.insert(key, idx);
        self.push_front(idx);
        Some((old_key, old_value))
    }

    /// エントリ数
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 最大エントリ数
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// すべてのエントリを削除
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.head = None;
        self.tail = None;
    }

    /// 最近使われた順にキーを走査
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            cursor = self.slots[idx].next;
            Some(&self.slots[idx].key)
        })
    }

    fn touch(&mut self, idx: usize) {
        if self.head != Some(idx) {
            self.detach(idx);
            self.push_front(idx);
        }
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.slots[idx].next = self.head;
        self.slots[idx].prev = None;
        if let Some(h) = self.head {
            self.slots[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }
}
