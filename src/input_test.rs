use super::*;

// =============================================================
// DragState
// =============================================================

#[test]
fn drag_state_default_is_idle() {
    let state = DragState::default();
    assert_eq!(state, DragState::Idle);
    assert!(!state.is_dragging());
    assert!(state.target().is_none());
}

#[test]
fn dragging_exposes_target() {
    let state = DragState::Dragging { id: ItemId::new("item-3"), offset: Point::new(4.0, 5.0) };
    assert!(state.is_dragging());
    assert_eq!(state.target().map(ItemId::as_str), Some("item-3"));
}

// =============================================================
// ClickTarget
// =============================================================

#[test]
fn click_targets_compare_by_id() {
    assert_eq!(ClickTarget::Item(ItemId::new("item-1")), ClickTarget::Item(ItemId::new("item-1")));
    assert_ne!(ClickTarget::Item(ItemId::new("item-1")), ClickTarget::Delete(ItemId::new("item-1")));
    assert_ne!(ClickTarget::Background, ClickTarget::Item(ItemId::new("item-1")));
}

// =============================================================
// FrameSlot
// =============================================================

#[test]
fn slot_starts_empty() {
    let mut slot: FrameSlot<u32> = FrameSlot::new();
    assert!(!slot.is_pending());
    assert!(slot.take().is_none());
}

#[test]
fn first_offer_requests_frame() {
    let mut slot = FrameSlot::new();
    assert!(slot.offer(1));
    assert!(slot.is_pending());
}

#[test]
fn later_offers_do_not_request_frames() {
    let mut slot = FrameSlot::new();
    assert!(slot.offer(1));
    for n in 2..50 {
        assert!(!slot.offer(n));
    }
}

#[test]
fn last_sample_wins() {
    let mut slot = FrameSlot::new();
    for n in 0..50 {
        slot.offer(n);
    }
    assert_eq!(slot.take(), Some(49));
    assert!(slot.take().is_none());
}

#[test]
fn take_rearms_the_slot() {
    let mut slot = FrameSlot::new();
    slot.offer(1);
    slot.take();
    assert!(slot.offer(2));
}

#[test]
fn clear_drops_pending_sample() {
    let mut slot = FrameSlot::new();
    slot.offer(Point::new(1.0, 1.0));
    slot.clear();
    assert!(!slot.is_pending());
    assert!(slot.take().is_none());
}
