/// Move selection cursor one item up, wrapping from 0 to `max`.
pub fn select_prev(selected: u8, max: u8) -> u8 {
    if selected == 0 || selected > max {
        max
    } else {
        selected - 1
    }
}

/// Move selection cursor one item down, wrapping from `max` to 0.
pub fn select_next(selected: u8, max: u8) -> u8 {
    if selected >= max {
        0
    } else {
        selected + 1
    }
}
