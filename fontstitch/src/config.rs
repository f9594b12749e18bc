//! The declarative recipe for a stitching run.
//!
//! Everything a run hard-codes nowhere else: input and output paths, the
//! filter policy, the display-glyph seed list, and the adjustment constants.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use fontedit::{font::Naming, mathtable::MathConstant, AnchorKind, GlyphName};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Recipe {
    /// The font whose glyph set is filtered and adjusted.
    pub base: PathBuf,
    /// Fonts whose glyphs merge into the base, in this order.
    #[serde(default)]
    pub merge: Vec<PathBuf>,
    #[serde(default)]
    pub filter: FilterPolicy,
    #[serde(default)]
    pub big_glyphs: BigGlyphs,
    #[serde(default)]
    pub adjust: Adjustments,
    #[serde(default)]
    pub names: Names,
    pub output: PathBuf,
}

impl Recipe {
    /// Read a recipe; relative paths resolve against the recipe's directory.
    pub fn load(path: &Path) -> Result<Recipe, Error> {
        if !path.exists() {
            return Err(Error::FileExpected(path.to_path_buf()));
        }
        let yml = fs::read_to_string(path).map_err(|source| Error::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut recipe: Recipe = serde_yaml::from_str(&yml)?;
        if let Some(dir) = path.parent() {
            recipe.resolve_relative_to(dir);
        }
        Ok(recipe)
    }

    fn resolve_relative_to(&mut self, dir: &Path) {
        for path in std::iter::once(&mut self.base)
            .chain(self.merge.iter_mut())
            .chain(std::iter::once(&mut self.output))
        {
            if path.is_relative() {
                *path = dir.join(path.as_path());
            }
        }
    }
}

/// Which glyphs of the base font survive to the merge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(
    tag = "policy",
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case"
)]
pub enum FilterPolicy {
    /// Drop base glyphs an incoming merge would duplicate, plus reserved
    /// name ranges.
    ExcludeDuplicates {
        #[serde(default = "default_reserved_prefixes")]
        reserved_prefixes: Vec<String>,
    },
    /// Keep only the listed names plus the expanded big-glyph set.
    RetainListed { keep: Vec<GlyphName> },
}

impl Default for FilterPolicy {
    fn default() -> Self {
        FilterPolicy::ExcludeDuplicates {
            reserved_prefixes: default_reserved_prefixes(),
        }
    }
}

// the Unicode math-alphanumeric blocks (u1D400.. and friends) arrive with
// the merged-in alphabets, so the base font's copies go
fn default_reserved_prefixes() -> Vec<String> {
    vec!["u1D".into(), "u1E".into()]
}

/// The display-sized glyph set: seeds plus how far to chase references.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BigGlyphs {
    #[serde(default)]
    pub seeds: Vec<GlyphName>,
    #[serde(default)]
    pub expansion: Expansion,
}

/// Whether expansion examines names it appended itself.
///
/// The two historical build scripts disagreed on this, so it stays a
/// choice rather than being silently normalized.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Expansion {
    /// Only the original seeds are expanded.
    #[default]
    SeedsOnly,
    /// Appended names are expanded too, to a fixed point.
    Transitive,
}

/// Stroke, anchor, and math-constant adjustments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Adjustments {
    /// Stroke-weight delta applied to every big glyph.
    pub weight_delta: f64,
    /// Delta for big glyphs whose name carries the variant marker.
    pub variant_weight_delta: f64,
    /// Substring marking a glyph as a stylistic variant.
    pub variant_marker: String,
    pub squish: Squish,
    #[serde(default)]
    pub anchors: Vec<AnchorSpec>,
    /// Math constants to overwrite in the output.
    #[serde(default)]
    pub math_constants: BTreeMap<MathConstant, i16>,
}

impl Default for Adjustments {
    fn default() -> Self {
        Adjustments {
            weight_delta: -10.0,
            variant_weight_delta: -15.0,
            variant_marker: "v1".into(),
            squish: Squish::default(),
            anchors: Vec::new(),
            math_constants: BTreeMap::new(),
        }
    }
}

/// Anisotropic narrowing of a fixed set of glyphs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Squish {
    pub glyphs: Vec<GlyphName>,
    pub x_scale: f64,
}

impl Default for Squish {
    fn default() -> Self {
        Squish {
            glyphs: Vec::new(),
            x_scale: 0.7,
        }
    }
}

/// One anchor point to add to one glyph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnchorSpec {
    pub glyph: GlyphName,
    #[serde(default)]
    pub name: String,
    pub kind: AnchorKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Name-table identity for the output.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Names {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub postscript_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub preferred_family: Option<String>,
}

impl From<Names> for Naming {
    fn from(names: Names) -> Naming {
        Naming {
            family: names.family,
            postscript_name: names.postscript_name,
            full_name: names.full_name,
            preferred_family: names.preferred_family,
        }
    }
}

#[cfg(test)]
mod tests {
    use fontedit::mathtable::MathConstant;
    use pretty_assertions::assert_eq;

    use super::{Expansion, FilterPolicy, Recipe};

    fn sample_recipe() -> &'static str {
        r#"
base: latinmodern-math.otf
merge:
  - xccmi10.otf
  - xccsy10.otf
filter:
  policy: exclude-duplicates
  reserved-prefixes: ["u1D", "u1E"]
big-glyphs:
  seeds: [integral, radical, summation]
  expansion: seeds-only
adjust:
  weight-delta: -10
  variant-weight-delta: -15
  variant-marker: v1
  squish:
    glyphs: [product.v1]
    x-scale: 0.7
  anchors:
    - glyph: f
      kind: base-mark
  math-constants:
    subscript-top-max: 300
    fraction-numerator-display-style-gap-min: 50
names:
  family: xccl
  postscript-name: xccl-regular
output: xccl.otf
"#
    }

    #[test]
    fn parses_a_full_recipe() {
        let recipe: Recipe = serde_yaml::from_str(sample_recipe()).unwrap();
        assert_eq!(2, recipe.merge.len());
        assert_eq!(
            FilterPolicy::ExcludeDuplicates {
                reserved_prefixes: vec!["u1D".into(), "u1E".into()]
            },
            recipe.filter
        );
        assert_eq!(Expansion::SeedsOnly, recipe.big_glyphs.expansion);
        assert_eq!(-10.0, recipe.adjust.weight_delta);
        assert_eq!(
            Some(&300),
            recipe
                .adjust
                .math_constants
                .get(&MathConstant::SubscriptTopMax)
        );
        assert_eq!("f", recipe.adjust.anchors[0].glyph.as_str());
        assert_eq!(Some("xccl".to_string()), recipe.names.family);
    }

    #[test]
    fn minimal_recipe_gets_defaults() {
        let recipe: Recipe =
            serde_yaml::from_str("base: a.otf\noutput: b.otf\n").unwrap();
        assert_eq!(FilterPolicy::default(), recipe.filter);
        assert_eq!(-10.0, recipe.adjust.weight_delta);
        assert_eq!("v1", recipe.adjust.variant_marker);
        assert_eq!(0.7, recipe.adjust.squish.x_scale);
        assert!(recipe.big_glyphs.seeds.is_empty());
    }

    #[test]
    fn retain_listed_parses() {
        let recipe: Recipe = serde_yaml::from_str(
            "base: a.otf\noutput: b.otf\nfilter:\n  policy: retain-listed\n  keep: [space, f]\n",
        )
        .unwrap();
        assert_eq!(
            FilterPolicy::RetainListed {
                keep: vec!["space".into(), "f".into()]
            },
            recipe.filter
        );
    }

    #[test]
    fn the_shipped_recipe_parses() {
        let recipe: Recipe =
            serde_yaml::from_str(include_str!("../resources/xccl.yml")).unwrap();
        assert_eq!(4, recipe.merge.len());
        assert_eq!(7, recipe.big_glyphs.seeds.len());
        assert_eq!(6, recipe.adjust.math_constants.len());
        assert_eq!(2, recipe.adjust.squish.glyphs.len());
        assert_eq!(Some("xccl".to_string()), recipe.names.preferred_family);
    }

    #[test]
    fn round_trips_through_yaml() {
        let recipe: Recipe = serde_yaml::from_str(sample_recipe()).unwrap();
        let yml = serde_yaml::to_string(&recipe).unwrap();
        assert_eq!(recipe, serde_yaml::from_str(&yml).unwrap());
    }
}
