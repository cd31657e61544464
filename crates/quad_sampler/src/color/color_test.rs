use super::*;

const A: Rgb = Rgb::new(10, 0, 0);
const B: Rgb = Rgb::new(0, 20, 0);
const C: Rgb = Rgb::new(0, 0, 30);
const D: Rgb = Rgb::new(40, 40, 40);

fn four_color_mapper() -> ColorMapper {
  // divisor = 30 / 3 = 10
  let profile = ColorProfile::ramp("test", vec![A, B, C, D]).unwrap();
  ColorMapper::new(profile, 30)
}

// =========================================================================
// Background
// =========================================================================

#[test]
fn test_zero_is_background_in_every_mode() {
  let mut mapper = four_color_mapper().with_background(Rgb::new(1, 2, 3));
  assert_eq!(mapper.to_color(0.0), Rgb::new(1, 2, 3));

  mapper.set_profile(ColorProfile::Greyscale);
  assert_eq!(mapper.to_color(0.0), Rgb::new(1, 2, 3));
}

#[test]
fn test_default_background_is_black() {
  assert_eq!(ColorMapper::default().background(), Rgb::BLACK);
  assert_eq!(ColorMapper::default().to_color(0.0), Rgb::BLACK);
}

// =========================================================================
// Ramp Indexing
// =========================================================================

/// index = floor(((raw / 10) mod 1)^0.25 × 4 × 3) mod 4
#[test]
fn test_ramp_index_formula() {
  let mapper = four_color_mapper();
  // t = 0.25 → 0.707 × 12 = 8.48 → 8 mod 4
  assert_eq!(mapper.to_color(2.5), A);
  // t = 0.1 → 0.562 × 12 = 6.75 → 6 mod 4
  assert_eq!(mapper.to_color(1.0), C);
  // t = 0.5 → 0.841 × 12 = 10.09 → 10 mod 4
  assert_eq!(mapper.to_color(5.0), C);
  // t = 0.9 → 0.974 × 12 = 11.69 → 11 mod 4
  assert_eq!(mapper.to_color(9.0), D);
  // t = 0.01 → 0.316 × 12 = 3.79 → 3
  assert_eq!(mapper.to_color(0.1), D);
}

#[test]
fn test_ramp_repeats_every_divisor() {
  let mapper = four_color_mapper();
  assert_eq!(mapper.to_color(5.0), mapper.to_color(15.0));
  assert_eq!(mapper.to_color(5.0), mapper.to_color(25.0));
}

#[test]
fn test_ramp_index_in_bounds_for_any_value() {
  let profile = ColorProfile::ramp("seven", vec![A; 7]).unwrap();
  let mapper = ColorMapper::new(profile, 97);
  for i in 1..5000 {
    assert_eq!(mapper.to_color(i as f64 * 0.173), A);
  }
  assert_eq!(mapper.to_color(f64::MAX), A);
}

#[test]
fn test_single_entry_ramp() {
  let profile = ColorProfile::ramp("solid", vec![B]).unwrap();
  let mapper = ColorMapper::new(profile, 100);
  assert_eq!(mapper.to_color(42.0), B);
}

// =========================================================================
// Greyscale
// =========================================================================

#[test]
fn test_greyscale_scales_and_saturates() {
  let mapper = ColorMapper::new(ColorProfile::Greyscale, 100);
  // 1 / 100 × 16384 = 163.84
  assert_eq!(mapper.to_color(1.0), Rgb::grey(163));
  assert_eq!(mapper.to_color(2.0), Rgb::grey(255));
  assert_eq!(mapper.to_color(100.0), Rgb::grey(255));
}

#[test]
fn test_greyscale_custom_scale() {
  let mapper = ColorMapper::new(ColorProfile::Greyscale, 100).with_greyscale_scale(255.0);
  assert_eq!(mapper.to_color(50.0), Rgb::grey(127));
  assert_eq!(mapper.to_color(100.0), Rgb::grey(255));
}

// =========================================================================
// Profiles
// =========================================================================

#[test]
fn test_empty_ramp_rejected() {
  assert_eq!(
    ColorProfile::ramp("void", Vec::new()),
    Err(SamplerError::EmptyRamp("void".to_string()))
  );
}

#[test]
fn test_ramp_table_is_never_empty() {
  assert_eq!(
    Ramp::new("x", Vec::new()),
    Err(SamplerError::EmptyRamp("x".to_string()))
  );

  let ramp = Ramp::new("pair", vec![A, B]).unwrap();
  assert_eq!(ramp.name(), "pair");
  assert_eq!(ramp.table(), &[A, B]);

  // Every constructible ramp profile maps without panicking
  let mapper = ColorMapper::new(ColorProfile::Ramp(ramp), 100);
  for raw in [0.5, 5.0, 99.0, f64::MAX] {
    assert!([A, B].contains(&mapper.to_color(raw)));
  }
}

#[test]
fn test_resolve_profiles() {
  let ramps = BuiltinRamps::default();
  assert_eq!(
    ColorProfile::resolve(GREYSCALE_PROFILE, &ramps).unwrap(),
    ColorProfile::Greyscale
  );

  let fire = ColorProfile::resolve("fire", &ramps).unwrap();
  assert_eq!(fire.name(), "fire");
  assert_eq!(fire.to_string(), "fire");

  assert_eq!(
    ColorProfile::resolve("nope", &ramps),
    Err(SamplerError::UnknownProfile("nope".to_string()))
  );

  let empty = BuiltinRamps::empty().with_ramp("blank", Vec::new());
  assert_eq!(
    ColorProfile::resolve("blank", &empty),
    Err(SamplerError::EmptyRamp("blank".to_string()))
  );
}
