//! Score → rank progression.
//!
//! `RankTable` owns an ordered, validated list of tiers that partitions the
//! non-negative integers, plus the free-tier score cap. Every read derives the
//! rank from the score; nothing here is stored.

use serde::Serialize;

use crate::domain::{RankTier, ScoreUpdate};
use crate::error::RankTableError;
use crate::seeds::seed_rank_tiers;

#[derive(Clone, Debug)]
pub struct RankTable {
  tiers: Vec<RankTier>,
  free_max_score: u32,
}

/// What the UI shows for a score.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankView {
  pub score: u32,
  /// Score used for display: capped at the free maximum for unpaid accounts.
  pub effective_score: u32,
  pub rank: RankTier,
  pub next_rank: Option<RankTier>,
  pub points_to_next_rank: u32,
  pub capped: bool,
}

impl RankTable {
  /// Validate that tiers are contiguous from 0, non-overlapping, and end unbounded.
  pub fn new(tiers: Vec<RankTier>, free_max_score: u32) -> Result<Self, RankTableError> {
    let first = tiers.first().ok_or(RankTableError::Empty)?;
    if first.min_score != 0 {
      return Err(RankTableError::FirstNotZero(first.min_score));
    }

    let mut keys = std::collections::HashSet::new();
    let mut expected_min = 0u32;
    for (i, tier) in tiers.iter().enumerate() {
      if !keys.insert(tier.key.as_str()) {
        return Err(RankTableError::DuplicateKey(tier.key.clone()));
      }
      if tier.min_score != expected_min {
        return Err(RankTableError::Gap { key: tier.key.clone(), expected: expected_min, found: tier.min_score });
      }
      let is_last = i + 1 == tiers.len();
      match (tier.max_score, is_last) {
        (None, true) => {}
        (None, false) => return Err(RankTableError::UnboundedNotLast(tier.key.clone())),
        (Some(_), true) => return Err(RankTableError::LastBounded(tier.key.clone())),
        (Some(max), false) => {
          if max < tier.min_score {
            return Err(RankTableError::Inverted { key: tier.key.clone(), min: tier.min_score, max });
          }
          expected_min = max.checked_add(1).ok_or_else(|| RankTableError::NoRoomAfter(tier.key.clone()))?;
        }
      }
    }

    Ok(Self { tiers, free_max_score })
  }

  /// The built-in 11-rank table with the given free cap (validated in tests).
  pub fn builtin(free_max_score: u32) -> Self {
    Self { tiers: seed_rank_tiers(), free_max_score }
  }

  pub fn tiers(&self) -> &[RankTier] {
    &self.tiers
  }

  pub fn free_max_score(&self) -> u32 {
    self.free_max_score
  }

  /// Rank for a score; negative scores count as 0.
  pub fn resolve(&self, score: i64) -> &RankTier {
    let normalized = u32::try_from(score.max(0)).unwrap_or(u32::MAX);
    self
      .tiers
      .iter()
      .find(|t| t.contains(normalized))
      .unwrap_or(&self.tiers[0])
  }

  /// The tier right above `current`, or None at the top (or for a tier not in this table).
  pub fn next(&self, current: &RankTier) -> Option<&RankTier> {
    let idx = self.tiers.iter().position(|t| t.key == current.key)?;
    self.tiers.get(idx + 1)
  }

  /// Points still needed to enter the next tier; 0 at the top.
  pub fn score_to_next(&self, score: i64) -> u32 {
    let current = self.resolve(score);
    let Some(next) = self.next(current) else {
      return 0;
    };
    let from = score.max(i64::from(current.min_score));
    let gap = i64::from(next.min_score) - from;
    u32::try_from(gap.max(0)).unwrap_or(u32::MAX)
  }

  /// Apply a signed delta. Going below zero clamps to 0 (still applied);
  /// an unpaid account crossing the free cap is rejected and keeps its score.
  pub fn apply_score_delta(&self, score: u32, delta: i32, is_paid: bool) -> ScoreUpdate {
    let candidate = i64::from(score) + i64::from(delta);
    if candidate < 0 {
      return ScoreUpdate { new_score: 0, applied: true };
    }
    if !is_paid && candidate > i64::from(self.free_max_score) {
      return ScoreUpdate { new_score: score, applied: false };
    }
    ScoreUpdate { new_score: u32::try_from(candidate).unwrap_or(u32::MAX), applied: true }
  }

  /// Score used for rank display. Stored score is never modified here.
  pub fn effective_score(&self, score: u32, is_paid: bool) -> u32 {
    if is_paid { score } else { score.min(self.free_max_score) }
  }

  pub fn view(&self, score: u32, is_paid: bool) -> RankView {
    let effective = self.effective_score(score, is_paid);
    let rank = self.resolve(i64::from(effective));
    RankView {
      score,
      effective_score: effective,
      rank: rank.clone(),
      next_rank: self.next(rank).cloned(),
      points_to_next_rank: self.score_to_next(i64::from(effective)),
      capped: effective < score,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::FREE_MAX_SCORE;

  fn table() -> RankTable {
    RankTable::new(seed_rank_tiers(), FREE_MAX_SCORE).unwrap()
  }

  #[test]
  fn builtin_matches_validated_table() {
    assert_eq!(RankTable::builtin(FREE_MAX_SCORE).tiers(), table().tiers());
    assert_eq!(RankTable::builtin(45).free_max_score(), 45);
  }

  fn tier(key: &str, min: u32, max: Option<u32>) -> RankTier {
    RankTier {
      key: key.into(),
      name: key.into(),
      description: String::new(),
      emoji: String::new(),
      min_score: min,
      max_score: max,
      requires_premium: false,
    }
  }

  #[test]
  fn default_table_matches_the_published_bands() {
    let t = table();
    let bands: Vec<(u32, Option<u32>, bool)> =
      t.tiers().iter().map(|r| (r.min_score, r.max_score, r.requires_premium)).collect();
    assert_eq!(
      bands,
      vec![
        (0, Some(10), false),
        (11, Some(25), false),
        (26, Some(45), false),
        (46, Some(70), true),
        (71, Some(100), true),
        (101, Some(135), true),
        (136, Some(175), true),
        (176, Some(220), true),
        (221, Some(280), true),
        (281, Some(340), true),
        (341, None, true),
      ]
    );
  }

  #[test]
  fn resolves_boundaries() {
    let t = table();
    assert_eq!(t.resolve(0).key, "baiDing");
    assert_eq!(t.resolve(10).key, "baiDing");
    assert_eq!(t.resolve(11).key, "xueTong");
    assert_eq!(t.resolve(45).key, "xiuCai");
    assert_eq!(t.resolve(46).key, "linSheng");
    assert_eq!(t.resolve(340).key, "bangYan");
    assert_eq!(t.resolve(341).key, "zhuangYuan");
    assert_eq!(t.resolve(1000).key, "zhuangYuan");
    assert_eq!(t.resolve(-5).key, "baiDing");
    assert_eq!(t.resolve(i64::MAX).key, "zhuangYuan");
  }

  #[test]
  fn resolve_is_monotonic_and_covers_every_score() {
    let t = table();
    let order = |key: &str| t.tiers().iter().position(|r| r.key == key).unwrap();
    let mut last = 0;
    for score in 0..=500i64 {
      let r = t.resolve(score);
      assert!(r.contains(score as u32));
      let idx = order(&r.key);
      assert!(idx >= last);
      last = idx;
    }
  }

  #[test]
  fn next_rank_and_distance() {
    let t = table();
    let first = t.resolve(0).clone();
    assert_eq!(t.next(&first).map(|r| r.key.as_str()), Some("xueTong"));
    let top = t.resolve(341).clone();
    assert!(t.next(&top).is_none());

    assert_eq!(t.score_to_next(10), 1);
    assert_eq!(t.score_to_next(0), 11);
    assert_eq!(t.score_to_next(30), 16);
    assert_eq!(t.score_to_next(341), 0);
    assert_eq!(t.score_to_next(5000), 0);
    // Measured from the tier floor when the raw score sits below it.
    assert_eq!(t.score_to_next(-3), 11);
  }

  #[test]
  fn applies_deltas_with_clamp_and_free_cap() {
    let t = table();
    assert_eq!(t.apply_score_delta(20, 10, false), ScoreUpdate { new_score: 20, applied: false });
    assert_eq!(t.apply_score_delta(5, -10, false), ScoreUpdate { new_score: 0, applied: true });
    assert_eq!(t.apply_score_delta(20, 3, false), ScoreUpdate { new_score: 23, applied: true });
    assert_eq!(t.apply_score_delta(24, 1, false), ScoreUpdate { new_score: 25, applied: true });
    assert_eq!(t.apply_score_delta(25, 1, false), ScoreUpdate { new_score: 25, applied: false });
    assert_eq!(t.apply_score_delta(20, 10, true), ScoreUpdate { new_score: 30, applied: true });
    assert_eq!(t.apply_score_delta(0, -2, true), ScoreUpdate { new_score: 0, applied: true });
  }

  #[test]
  fn unpaid_view_caps_display_without_touching_score() {
    let t = table();
    let v = t.view(60, false);
    assert_eq!(v.score, 60);
    assert_eq!(v.effective_score, 25);
    assert_eq!(v.rank.key, "xueTong");
    assert_eq!(v.next_rank.as_ref().map(|r| r.key.as_str()), Some("xiuCai"));
    assert_eq!(v.points_to_next_rank, 1);
    assert!(v.capped);

    let paid = t.view(60, true);
    assert_eq!(paid.effective_score, 60);
    assert_eq!(paid.rank.key, "linSheng");
    assert_eq!(paid.points_to_next_rank, 11);
    assert!(!paid.capped);
  }

  #[test]
  fn rejects_broken_tables() {
    assert_eq!(RankTable::new(vec![], 25).unwrap_err(), RankTableError::Empty);
    assert_eq!(
      RankTable::new(vec![tier("a", 1, None)], 25).unwrap_err(),
      RankTableError::FirstNotZero(1)
    );
    assert!(matches!(
      RankTable::new(vec![tier("a", 0, Some(10)), tier("b", 12, None)], 25),
      Err(RankTableError::Gap { expected: 11, found: 12, .. })
    ));
    assert!(matches!(
      RankTable::new(vec![tier("a", 0, Some(10)), tier("b", 9, None)], 25),
      Err(RankTableError::Gap { .. })
    ));
    assert_eq!(
      RankTable::new(vec![tier("a", 0, None), tier("b", 1, None)], 25).unwrap_err(),
      RankTableError::UnboundedNotLast("a".into())
    );
    assert_eq!(
      RankTable::new(vec![tier("a", 0, Some(10))], 25).unwrap_err(),
      RankTableError::LastBounded("a".into())
    );
    assert_eq!(
      RankTable::new(vec![tier("a", 0, Some(10)), tier("a", 11, None)], 25).unwrap_err(),
      RankTableError::DuplicateKey("a".into())
    );
  }

  #[test]
  fn bounded_tier_ending_at_max_score_leaves_no_room() {
    let tiers = vec![tier("a", 0, Some(u32::MAX)), tier("b", u32::MAX, None)];
    assert_eq!(RankTable::new(tiers, 25).unwrap_err(), RankTableError::NoRoomAfter("a".into()));
    assert!(RankTable::new(vec![tier("a", 0, Some(u32::MAX - 1)), tier("b", u32::MAX, None)], 25).is_ok());
  }

  #[test]
  fn single_unbounded_tier_is_valid() {
    let t = RankTable::new(vec![tier("only", 0, None)], 25).unwrap();
    assert_eq!(t.resolve(99).key, "only");
    assert_eq!(t.score_to_next(99), 0);
  }
}
