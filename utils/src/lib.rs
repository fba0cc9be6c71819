/// Rounds `num` up to the next multiple of `step`. Multiples are returned unchanged.
pub fn round_up(step: u32, num: u32) -> u32 {
    match num % step {
        0 => num,
        rest => num + (step - rest),
    }
}

/// The amount that has to be added to `num` so it becomes a multiple of `step`.
pub fn padding_to(step: u32, num: u32) -> u32 {
    round_up(step, num) - num
}
