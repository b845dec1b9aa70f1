use plotaxis::api::{LabelExtent, cull};

fn extents(pairs: &[(f64, f64)]) -> Vec<LabelExtent> {
    pairs
        .iter()
        .map(|&(leading, trailing)| LabelExtent::new(leading, trailing))
        .collect()
}

#[test]
fn crowded_labels_show_every_other_one() {
    let labels: Vec<LabelExtent> = (0..6)
        .map(|index| {
            let centre = f64::from(index) * 10.0;
            LabelExtent::new(centre - 7.5, centre + 7.5)
        })
        .collect();

    assert_eq!(
        cull(&labels, 100.0),
        vec![true, false, true, false, true, false]
    );
}

#[test]
fn single_wide_label_sets_a_uniform_stride() {
    let labels = extents(&[
        (-4.0, 4.0),
        (6.0, 14.0),
        (16.0, 24.0),
        (22.0, 38.0),
        (36.0, 44.0),
        (46.0, 54.0),
        (56.0, 64.0),
    ]);

    assert_eq!(
        cull(&labels, 100.0),
        vec![true, false, true, false, true, false, true]
    );
}

#[test]
fn interior_labels_beyond_the_axis_are_hidden() {
    let labels = extents(&[(0.0, 5.0), (10.0, 15.0), (120.0, 125.0), (130.0, 135.0)]);
    assert_eq!(cull(&labels, 100.0), vec![true, true, false, true]);
}

#[test]
fn last_label_stays_eligible_past_the_axis_end() {
    let labels = extents(&[(0.0, 5.0), (10.0, 15.0), (120.0, 125.0)]);
    assert_eq!(cull(&labels, 100.0), vec![true, true, true]);
}

#[test]
fn first_label_is_never_culled() {
    let labels = extents(&[(-20.0, -10.0), (10.0, 15.0)]);
    assert_eq!(cull(&labels, 100.0), vec![true, true]);
}

#[test]
fn no_labels_yield_empty_mask() {
    assert!(cull(&[], 100.0).is_empty());
}
