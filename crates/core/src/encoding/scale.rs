use indexmap::IndexSet;
use strand_protocol::Color;

use crate::encoding::color::interpolate_colors;

/// A resolved channel domain.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleDomain {
    Continuous([f64; 2]),
    Categorical(IndexSet<String>),
}

impl ScaleDomain {
    pub fn as_continuous(&self) -> Option<[f64; 2]> {
        match self {
            Self::Continuous(d) => Some(*d),
            Self::Categorical(_) => None,
        }
    }

    pub fn categories(&self) -> Option<&IndexSet<String>> {
        match self {
            Self::Categorical(c) => Some(c),
            Self::Continuous(_) => None,
        }
    }

    /// The smallest domain covering both; categories keep first-seen
    /// order. Equal domains, including reversed literals, are kept as is,
    /// and domains of different kinds keep `self`.
    pub fn union(&self, other: &Self) -> Self {
        if self == other {
            return self.clone();
        }
        match (self, other) {
            (Self::Continuous([a0, a1]), Self::Continuous([b0, b1])) => {
                Self::Continuous([a0.min(*a1).min(b0.min(*b1)), a0.max(*a1).max(b0.max(*b1))])
            }
            (Self::Categorical(a), Self::Categorical(b)) => {
                Self::Categorical(a.iter().chain(b).cloned().collect())
            }
            _ => self.clone(),
        }
    }
}

/// A resolved channel range.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleRange {
    Extent([f64; 2]),
    Values(Vec<f64>),
    Colors(Vec<Color>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Position of `value` along the domain, in `[0, 1]` when inside it.
    pub fn normalize(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        if d1 == d0 { 0.0 } else { (value - d0) / (d1 - d0) }
    }
}

/// Equal-width slots, one per category, laid out from `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    categories: IndexSet<String>,
    start: f64,
    extent: f64,
}

impl BandScale {
    pub fn new(categories: IndexSet<String>, range: [f64; 2]) -> Self {
        Self {
            categories,
            start: range[0],
            extent: range[1] - range[0],
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn bandwidth(&self) -> f64 {
        if self.categories.is_empty() {
            self.extent
        } else {
            self.extent / self.categories.len() as f64
        }
    }

    pub fn slot_start(&self, key: &str) -> Option<f64> {
        let index = self.categories.get_index_of(key)?;
        Some(self.start + index as f64 * self.bandwidth())
    }

    pub fn slot_center(&self, key: &str) -> Option<f64> {
        self.slot_start(key).map(|s| s + self.bandwidth() / 2.0)
    }

    pub fn categories(&self) -> &IndexSet<String> {
        &self.categories
    }
}

/// The scale a channel encodes through.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    Linear(LinearScale),
    Band(BandScale),
    /// Quantitative color: domain position picks a point on the ramp.
    Sequential { domain: [f64; 2], colors: Vec<Color> },
    /// Nominal color: categories cycle through the palette.
    Palette {
        categories: IndexSet<String>,
        colors: Vec<Color>,
    },
    /// Nominal numeric channel (size, opacity, ...): categories cycle
    /// through the values.
    Ordinal {
        categories: IndexSet<String>,
        values: Vec<f64>,
    },
}

impl Scale {
    pub fn number(&self, value: f64) -> Option<f64> {
        match self {
            Self::Linear(linear) => Some(linear.apply(value)),
            _ => None,
        }
    }

    pub fn color_of_number(&self, value: f64) -> Option<Color> {
        match self {
            Self::Sequential { domain, colors } => {
                let t = LinearScale {
                    domain: *domain,
                    range: [0.0, 1.0],
                }
                .normalize(value);
                Some(interpolate_colors(colors, t))
            }
            _ => None,
        }
    }

    pub fn color_of_category(&self, key: &str) -> Option<Color> {
        match self {
            Self::Palette { categories, colors } if !colors.is_empty() => {
                let index = categories.get_index_of(key)?;
                Some(colors[index % colors.len()])
            }
            _ => None,
        }
    }

    pub fn number_of_category(&self, key: &str) -> Option<f64> {
        match self {
            Self::Band(band) => band.slot_center(key),
            Self::Ordinal { categories, values } if !values.is_empty() => {
                let index = categories.get_index_of(key)?;
                Some(values[index % values.len()])
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> IndexSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn linear_scale_maps_and_inverts() {
        let s = LinearScale {
            domain: [0.0, 10.0],
            range: [0.0, 65.0],
        };
        assert_eq!(s.apply(10.0), 65.0);
        assert_eq!(s.apply(5.0), 32.5);
        assert_eq!(s.invert(65.0), 10.0);
        let degenerate = LinearScale {
            domain: [0.0, 0.0],
            range: [3.0, 9.0],
        };
        assert_eq!(degenerate.apply(0.0), 3.0);
    }

    #[test]
    fn band_scale_slots() {
        let band = BandScale::new(set(&["a", "b"]), [0.0, 100.0]);
        assert_eq!(band.bandwidth(), 50.0);
        assert_eq!(band.slot_start("b"), Some(50.0));
        assert_eq!(band.slot_center("a"), Some(25.0));
        assert_eq!(band.slot_start("z"), None);
    }

    #[test]
    fn palette_cycles_and_rejects_unknown_categories() {
        let scale = Scale::Palette {
            categories: set(&["a", "b", "c"]),
            colors: vec![Color::BLACK, Color::WHITE],
        };
        assert_eq!(scale.color_of_category("c"), Some(Color::BLACK));
        assert_eq!(scale.color_of_category("nope"), None);
    }

    #[test]
    fn unions_cover_both_domains() {
        let a = ScaleDomain::Continuous([0.0, 5.0]);
        let b = ScaleDomain::Continuous([2.0, 10.0]);
        assert_eq!(a.union(&b), ScaleDomain::Continuous([0.0, 10.0]));
        let reversed = ScaleDomain::Continuous([10.0, 0.0]);
        assert_eq!(reversed.union(&reversed), reversed);
        let merged = ScaleDomain::Categorical(set(&["b", "a"]))
            .union(&ScaleDomain::Categorical(set(&["a", "c"])));
        assert_eq!(merged, ScaleDomain::Categorical(set(&["b", "a", "c"])));
        assert_eq!(a.union(&merged), a);
    }
}
