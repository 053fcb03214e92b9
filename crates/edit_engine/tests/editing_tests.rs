//! Integration tests for interactive editing
//!
//! Drives the editor through random move, align, and snap sequences and
//! checks that every label stays inside the inner page area.

use edit_engine::{AlignReference, Alignment, ResizeAxis, SheetEditor};
use proptest::prelude::*;
use sheet_model::{LabelItem, LabelSheet, LayoutMode, PageSpec, Rect, Vec2};

#[derive(Debug, Clone)]
enum Action {
    Move(f64, f64),
    Resize(ResizeAxis, f64, f64),
    Align(Alignment, AlignReference),
    Snap(f64),
    Position(usize, f64, f64),
    Select(Vec<usize>),
    EditAll(bool),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    let axis = prop_oneof![Just(ResizeAxis::X), Just(ResizeAxis::Y), Just(ResizeAxis::Both)];
    let alignment = prop_oneof![
        Just(Alignment::Left),
        Just(Alignment::CenterH),
        Just(Alignment::Top),
        Just(Alignment::CenterV),
        Just(Alignment::CenterBoth),
    ];
    let reference = prop_oneof![Just(AlignReference::Cell), Just(AlignReference::Page)];
    prop_oneof![
        (-400.0..400.0f64, -400.0..400.0f64).prop_map(|(x, y)| Action::Move(x, y)),
        (axis, -300.0..300.0f64, -300.0..300.0f64).prop_map(|(a, x, y)| Action::Resize(a, x, y)),
        (alignment, reference).prop_map(|(a, r)| Action::Align(a, r)),
        prop_oneof![Just(0.0), Just(1.0), Just(2.0), Just(5.0)].prop_map(Action::Snap),
        (0..6usize, -300.0..300.0f64, -300.0..300.0f64).prop_map(|(i, x, y)| Action::Position(i, x, y)),
        proptest::collection::vec(0..6usize, 0..4).prop_map(Action::Select),
        proptest::bool::ANY.prop_map(Action::EditAll),
    ]
}

fn free_form_editor() -> SheetEditor {
    let mut sheet = LabelSheet::new(PageSpec::new(210.0, 297.0, 10.0, 3.0, 3, 2)).unwrap();
    sheet.settings.layout_mode = LayoutMode::FreeForm;
    sheet.labels_mut().add_many(vec![
        LabelItem::new("qrcode", "https://example.com/a"),
        LabelItem::new("code128", "PART-0001"),
        LabelItem::new("ean13", "5901234123457"),
        LabelItem::new("datamatrix", "LOT 77"),
        LabelItem::new("code39", "ABC"),
        LabelItem::new("pdf417", "manifest"),
    ]);
    SheetEditor::with_sheet(sheet)
}

proptest! {
    #[test]
    fn prop_free_form_edits_stay_inside(actions in proptest::collection::vec(action_strategy(), 1..25)) {
        let mut editor = free_form_editor();
        for action in actions {
            match action {
                Action::Move(x, y) => editor.move_selection(Vec2::new(x, y)).unwrap(),
                Action::Resize(axis, x, y) => editor.resize_selection(axis, Vec2::new(x, y)).unwrap(),
                Action::Align(alignment, reference) => editor.align(alignment, reference).unwrap(),
                Action::Snap(mm) => editor.set_snap(mm),
                Action::Position(index, x, y) => {
                    editor.set_position(index, Vec2::new(x, y)).unwrap();
                }
                Action::Select(indices) => editor.select_indices(&indices).unwrap(),
                Action::EditAll(on) => editor.set_edit_all(on).unwrap(),
            }

            let inner = Rect::from_origin_size(Vec2::ZERO, editor.sheet().grid().inner_size());
            let labels = editor.sheet().labels();
            let resolver = editor.resolver();
            for index in 0..labels.len() {
                if let Some(position) = labels.position_override(index) {
                    let size = resolver.draw_size(index).unwrap();
                    let frame = Rect::from_origin_size(position, size);
                    prop_assert!(inner.contains_rect(&frame), "stored {:?} escapes {:?}", frame, inner);
                }
                let placement = resolver.resolve_current(index).unwrap();
                let frame = placement.label().unwrap().frame;
                prop_assert!(inner.contains_rect(&frame), "resolved {:?} escapes {:?}", frame, inner);
            }
        }
    }
}

#[test]
fn test_edit_then_delete_keeps_geometry() {
    let mut editor = free_form_editor();
    editor.set_snap(1.0);
    editor.select_indices(&[2, 4]).unwrap();
    editor.move_selection(Vec2::new(5.2, 9.7)).unwrap();
    let before = editor.resolver().resolve_current(4).unwrap();
    let moved = before.label().unwrap().clone();

    editor.select_indices(&[0, 1]).unwrap();
    editor.delete_selection().unwrap();

    let after = editor.resolver().resolve_current(2).unwrap();
    let after = after.label().unwrap();
    assert_eq!(after.id, moved.id);
    assert_eq!(after.frame.size(), moved.frame.size());
    // the label changed slots, but its free-form position is its own
    assert_eq!(after.frame.origin(), moved.frame.origin());
}
