// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{RandomSource, SeededRandom};

#[test]
fn test_shuffle_puts_everyone_first_about_equally_often() {
    let mut rng: SeededRandom = SeededRandom::from_seed(42);
    let mut first_counts: [usize; 4] = [0; 4];

    for _ in 0..4000 {
        let mut order: Vec<usize> = vec![0, 1, 2, 3];
        rng.shuffle(&mut order);
        first_counts[order[0]] += 1;
    }

    for count in first_counts {
        assert!((800..=1200).contains(&count), "skewed count {count}");
    }
}

#[test]
fn test_pick_index_stays_in_range() {
    let mut rng: SeededRandom = SeededRandom::from_seed(7);

    assert_eq!(rng.pick_index(0), None);
    for _ in 0..100 {
        assert!(rng.pick_index(3).unwrap() < 3);
    }
}

#[test]
fn test_pick_on_empty_slice_is_none() {
    let mut rng: SeededRandom = SeededRandom::from_seed(7);
    let empty: [u8; 0] = [];

    assert_eq!(rng.pick(&empty), None);
    assert_eq!(rng.pick(&[9]), Some(&9));
}

#[test]
fn test_seed_is_kept() {
    assert_eq!(SeededRandom::from_seed(99).seed(), 99);
}
