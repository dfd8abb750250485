use snap_base::{Rect, Vec2};

#[test]
fn test_min_max() {
    let r = Rect::new(Vec2::new(42usize, 0), Vec2::new(1836, 1080));
    assert_eq!(r.min(), Vec2::new(42, 0));
    assert_eq!(r.max(), Vec2::new(1878, 1080));
}

#[test]
fn test_center() {
    let r = Rect::new(Vec2::new(0.0_f64, 0.0), Vec2::new(10.0, 6.0));
    let c = r.center();
    assert!((c.x - 5.0).abs() < 1e-10);
    assert!((c.y - 3.0).abs() < 1e-10);
}

#[test]
fn test_area() {
    let r = Rect::new(Vec2::new(3usize, 4), Vec2::new(5, 3));
    assert_eq!(r.area(), 15);
}

#[test]
fn test_transposed_swaps_axes() {
    let r = Rect::new(Vec2::new(42usize, 7), Vec2::new(1836, 1080));
    let t = r.transposed();
    assert_eq!(t.origin, Vec2::new(7, 42));
    assert_eq!(t.size, Vec2::new(1080, 1836));
    assert_eq!(t.transposed(), r);
}

#[test]
fn test_contains_point_half_open() {
    let r = Rect::new(Vec2::new(0usize, 0), Vec2::new(10, 10));
    assert!(r.contains_point(Vec2::new(0, 0)));
    assert!(r.contains_point(Vec2::new(9, 9)));
    assert!(!r.contains_point(Vec2::new(10, 5)));
    assert!(!r.contains_point(Vec2::new(5, 10)));
}

#[test]
fn test_contains_rect_touching_edges() {
    let frame = Rect::new(Vec2::new(0usize, 0), Vec2::new(1920, 1080));
    let crop = Rect::new(Vec2::new(42usize, 0), Vec2::new(1836, 1080));
    assert!(frame.contains_rect(crop));
}

#[test]
fn test_contains_rect_overhang() {
    let frame = Rect::new(Vec2::new(0usize, 0), Vec2::new(1920, 1080));
    let crop = Rect::new(Vec2::new(100usize, 0), Vec2::new(1836, 1080));
    assert!(!frame.contains_rect(crop));
}

#[test]
fn test_as_f64() {
    let r = Rect::new(Vec2::new(1usize, 2), Vec2::new(3, 4));
    let f = r.as_f64();
    assert_eq!(f.origin, Vec2::new(1.0, 2.0));
    assert_eq!(f.size, Vec2::new(3.0, 4.0));
}
