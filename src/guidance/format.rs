/// Fixed-point rendering that rounds halves away from zero (`0.125` -> `"0.13"`).
pub fn fixed(value: f64, digits: u32) -> String {
    format!("{:.*}", digits as usize, round_to(value, digits))
}

pub fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}
