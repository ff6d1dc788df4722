//! Day records — one per user per calendar date — and the four-slot state
//! machine that fills them.

use chrono::{NaiveDate, NaiveTime};

use crate::{deviation::Deviation, punch::PunchRecord};

// ─── Slots ───────────────────────────────────────────────────────────────────

/// One of the four ordered daily clock positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
  Entrance1,
  Exit1,
  Entrance2,
  Exit2,
}

impl Slot {
  /// All slots in fill order.
  pub const ALL: [Slot; 4] =
    [Slot::Entrance1, Slot::Exit1, Slot::Entrance2, Slot::Exit2];

  fn index(self) -> usize {
    match self {
      Slot::Entrance1 => 0,
      Slot::Exit1 => 1,
      Slot::Entrance2 => 2,
      Slot::Exit2 => 3,
    }
  }
}

/// How far a day record has been filled. Transitions only move forward, one
/// step per accepted punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
  #[default]
  Empty,
  /// entrance1 filled.
  E1,
  /// entrance1 and exit1 filled.
  E1S1,
  /// entrance1, exit1 and entrance2 filled.
  E1S1E2,
  /// All four slots filled; further punches are ignored.
  Full,
}

impl SlotState {
  /// The slot the next punch lands in, and the state after it. `None` once
  /// the record is full.
  pub fn transition(self) -> Option<(Slot, SlotState)> {
    match self {
      SlotState::Empty => Some((Slot::Entrance1, SlotState::E1)),
      SlotState::E1 => Some((Slot::Exit1, SlotState::E1S1)),
      SlotState::E1S1 => Some((Slot::Entrance2, SlotState::E1S1E2)),
      SlotState::E1S1E2 => Some((Slot::Exit2, SlotState::Full)),
      SlotState::Full => None,
    }
  }
}

// ─── Day record ──────────────────────────────────────────────────────────────

/// Identity of a day record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayKey {
  pub date:    NaiveDate,
  pub user_id: String,
}

/// The reconstructed clock events of one user on one day.
///
/// Department and name are those of the first punch seen for the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
  pub date:       NaiveDate,
  pub user_id:    String,
  pub department: String,
  pub name:       String,
  state:          SlotState,
  times:          [Option<NaiveTime>; 4],
  deviations:     [Option<Deviation>; 4],
}

impl DayRecord {
  /// An empty record carrying the identity of `punch`. The punch itself is
  /// not recorded.
  pub fn for_punch(punch: &PunchRecord) -> Self {
    Self {
      date:       punch.date(),
      user_id:    punch.user_id.clone(),
      department: punch.department.clone(),
      name:       punch.name.clone(),
      state:      SlotState::Empty,
      times:      [None; 4],
      deviations: [None; 4],
    }
  }

  pub fn state(&self) -> SlotState { self.state }

  pub fn time(&self, slot: Slot) -> Option<NaiveTime> { self.times[slot.index()] }

  pub fn deviation(&self, slot: Slot) -> Option<Deviation> {
    self.deviations[slot.index()]
  }

  pub(crate) fn set_deviation(&mut self, slot: Slot, deviation: Option<Deviation>) {
    self.deviations[slot.index()] = deviation;
  }

  /// Put `time` into the next empty slot. Returns the slot that was filled,
  /// or `None` (leaving the record unchanged) when all four are taken.
  pub fn record(&mut self, time: NaiveTime) -> Option<Slot> {
    let (slot, next) = self.state.transition()?;
    self.times[slot.index()] = Some(time);
    self.state = next;
    Some(slot)
  }

  /// Exactly entrance1 and exit1 are filled: a day without a midday break.
  pub fn is_single_pair(&self) -> bool { self.state == SlotState::E1S1 }
}
