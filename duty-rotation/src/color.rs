use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::RangeInclusive;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};

/// 各チャンネルはこの範囲から選ぶ。黒文字が読める明るさ
pub const PASTEL_CHANNEL: RangeInclusive<u8> = 0xA0..=0xF0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_pastel(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|channel| PASTEL_CHANNEL.contains(channel))
    }

    fn random_pastel<R: Rng>(rng: &mut R) -> Self {
        Self {
            r: rng.random_range(PASTEL_CHANNEL),
            g: rng.random_range(PASTEL_CHANNEL),
            b: rng.random_range(PASTEL_CHANNEL),
        }
    }
}

/// `#rrggbb`
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct RegistryState {
    colors: HashMap<String, Color>,
    initialized: bool,
    rng: StdRng,
}

impl RegistryState {
    fn assign(&mut self, name: &str) -> Color {
        if let Some(color) = self.colors.get(name) {
            return *color;
        }
        let color = Color::random_pastel(&mut self.rng);
        self.colors.insert(name.to_string(), color);
        color
    }
}

/// 担当者名 -> 表示色
///
/// 永続化はしない。一度色が付いた名前は [`ColorRegistry::evict`] まで同じ色のまま
pub struct ColorRegistry {
    state: Mutex<RegistryState>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// テスト用。色が決定的になる
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                colors: HashMap::new(),
                initialized: false,
                rng,
            }),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// 初回だけ色を割り当てる。確認と割り当ては同じロックの中で行う。
    /// この呼び出しが割り当てたら true
    pub fn initialize_with<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.state.lock();
        if state.initialized {
            return false;
        }
        for name in names {
            state.assign(name.as_ref());
        }
        state.initialized = true;
        true
    }

    /// まだ色の無い名前に色を付け、追加した数を返す
    pub fn ensure_colors<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.state.lock();
        let before = state.colors.len();
        for name in names {
            state.assign(name.as_ref());
        }
        state.colors.len() - before
    }

    pub fn color_for(&self, name: &str) -> Color {
        self.state.lock().assign(name)
    }

    pub fn get(&self, name: &str) -> Option<Color> {
        self.state.lock().colors.get(name).copied()
    }

    pub fn evict(&self, name: &str) -> Option<Color> {
        self.state.lock().colors.remove(name)
    }

    pub fn snapshot(&self) -> BTreeMap<String, Color> {
        self.state
            .lock()
            .colors
            .iter()
            .map(|(name, color)| (name.clone(), *color))
            .collect()
    }
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
