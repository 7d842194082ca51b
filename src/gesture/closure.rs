use super::landmarks::{
    LandmarkSet, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP,
    RING_TIP,
};

/// (tip, base) pairs for the four fingers; the thumb is left out because it
/// folds differently depending on hand orientation
pub const FINGER_PAIRS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Number of fingers whose tip sits below its base joint
pub fn curled_fingers(hand: &LandmarkSet) -> usize {
    FINGER_PAIRS
        .iter()
        .filter(|&&(tip, base)| hand.get(tip).y > hand.get(base).y)
        .count()
}

/// True when all four fingers are curled
pub fn is_hand_closed(hand: &LandmarkSet) -> bool {
    curled_fingers(hand) == FINGER_PAIRS.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::landmarks::{Landmark, LANDMARK_COUNT, THUMB_TIP};

    fn hand(curled: [bool; 4]) -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        for (&(tip, base), &is_curled) in FINGER_PAIRS.iter().zip(curled.iter()) {
            points[base] = Landmark::new(0.5, 0.5);
            points[tip] = Landmark::new(0.5, if is_curled { 0.6 } else { 0.3 });
        }
        LandmarkSet::new(points).unwrap()
    }

    #[test]
    fn test_fist_is_closed() {
        assert!(is_hand_closed(&hand([true; 4])));
    }

    #[test]
    fn test_any_open_finger_opens_hand() {
        for open in 0..4 {
            let mut curled = [true; 4];
            curled[open] = false;
            assert!(!is_hand_closed(&hand(curled)), "finger {} open", open);
        }
    }

    #[test]
    fn test_tip_level_with_base_is_not_curled() {
        let mut points = hand([true; 4]).points().to_vec();
        points[RING_TIP] = points[RING_PIP];
        let level = LandmarkSet::new(points).unwrap();
        assert_eq!(curled_fingers(&level), 3);
        assert!(!is_hand_closed(&level));
    }

    #[test]
    fn test_thumb_is_ignored() {
        let mut points = hand([true; 4]).points().to_vec();
        points[THUMB_TIP] = Landmark::new(0.1, 0.0);
        assert!(is_hand_closed(&LandmarkSet::new(points).unwrap()));
    }
}
