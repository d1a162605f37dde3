use crate::records::*;
use fieldwise::{
    amap, construct, fmap, gather, gather_all, get, names, names_of, pure, registry,
    same_record, values, ConstructionFault, Error, Record, Shaped,
};
use proptest::prelude::*;

fn r2(x: i64, y: i64) -> F2<i64> {
    F2 { x, y }
}

fn r3ext(x: i64, y: i64, z: i64) -> F2Ext<i64> {
    F2Ext {
        base: F2 { x, y },
        z,
    }
}

#[test]
fn fmap_increments() {
    assert_eq!(fmap(|v| v + 1, r2(3, 4)), Ok(r2(4, 5)));
}

#[test]
fn pure_reifies_the_template_shape() {
    assert_eq!(pure(&r2(0, 0), 9), Ok(r2(9, 9)));
}

#[test]
fn amap_applies_each_field() {
    let functions: F2<fn(i64) -> i64> = F2 {
        x: |v| v + 1,
        y: |v| v * 2,
    };
    assert_eq!(amap(functions, r2(3, 4)), Ok(r2(4, 8)));
}

#[test]
fn gather_zips_two_records() {
    assert_eq!(
        gather((r2(1, 2), r2(10, 20))),
        Ok(F2 {
            x: (1, 10),
            y: (2, 20)
        })
    );
}

#[test]
fn extension_maps_inherited_fields() {
    assert_eq!(fmap(|v| v * 2, r3ext(1, 2, 3)), Ok(r3ext(2, 4, 6)));
    assert_eq!(names::<F2Ext<i64>>(), ["x", "y", "z"]);
}

#[test]
fn redeclared_field_keeps_inherited_slot() {
    let r = G4Redeclared {
        base: F3 { x: 1, y: 2, z: 3 },
        w: 4,
    };
    assert_eq!(names::<G4Redeclared<i64>>(), ["x", "y", "z", "w"]);
    assert_eq!(values(&r), vec![&1, &2, &3, &4]);
    assert_eq!(values(&r).len(), names_of(&r).len());
    assert_eq!(get(&r, "x"), Ok(&1));
    assert_eq!(get(&r, "w"), Ok(&4));
    assert_eq!(fmap(|v| v, r.clone()), Ok(r.clone()));
    let shape = <G4Redeclared<i64> as Shaped>::shape();
    assert_eq!(shape.own_fields(), ["x", "w"]);
    assert!(same_record(&r, &G4Redeclared::from_values(vec![1, 2, 3, 4]).unwrap()));
}

#[test]
fn amap_across_shapes_fails() {
    let functions: F2<fn(i64) -> i64> = F2 {
        x: |v| v + 1,
        y: |v| v + 1,
    };
    let err = amap(functions, r3ext(1, 2, 3)).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }), "{err}");
}

#[test]
fn conforming_record_types_still_differ() {
    let ext = r3ext(1, 2, 3);
    let flat = F3 { x: 1, y: 2, z: 3 };

    assert_eq!(names_of(&ext), names_of(&flat));
    assert!(!same_record(&ext, &flat));

    // conforming shapes combine, the result keeps the argument's type
    let functions = fmap(|_| |v: i64| v * 10, flat).unwrap();
    assert_eq!(amap(functions, ext), Ok(r3ext(10, 20, 30)));
}

#[test]
fn validated_records_reject_bad_results() {
    let span = Span { start: 1, end: 5 };
    assert_eq!(fmap(|v| v * 2, span.clone()), Ok(Span { start: 2, end: 10 }));
    assert_eq!(
        fmap(|v| -v, span),
        Err(Error::Construction {
            record: "Span",
            fault: ConstructionFault::Rejected("span ends before it starts".to_string()),
        })
    );
    assert!(construct::<Span<i64>, _>([("start", 3), ("end", 2)]).is_err());
}

#[test]
fn registry_knows_derived_records() {
    assert_eq!(registry::names("G4"), Ok(&["x", "y", "z", "w"][..]));
    assert_eq!(
        registry::names("fieldwise_tests::records::F2Ext"),
        Ok(&["x", "y", "z"][..])
    );
    assert_eq!(
        registry::names("Vec"),
        Err(Error::UnsupportedType("Vec".to_string()))
    );
}

#[test]
fn gather_all_columns() {
    let gathered = gather_all((0..4).map(|i| r2(i, -i))).unwrap();
    assert_eq!(
        gathered,
        F2 {
            x: vec![0, 1, 2, 3],
            y: vec![0, -1, -2, -3]
        }
    );
}

proptest! {
    #[test]
    fn extension_never_equals_base(g in arb_record::<G4<i64>>()) {
        prop_assert!(!same_record(&g, &g.base));
        prop_assert!(same_record(&g, &g.clone()));
        prop_assert_eq!(values(&g.base), values(&g)[..3].to_vec());
    }

    #[test]
    fn get_agrees_with_values(g in arb_record::<G4<i64>>()) {
        for (name, value) in names::<G4<i64>>().iter().zip(values(&g)) {
            prop_assert_eq!(get(&g, name), Ok(value));
        }
        prop_assert_eq!(
            get(&g, "v"),
            Err(Error::NoSuchField { record: "G4", field: "v".to_string() })
        );
    }

    #[test]
    fn mismatched_shapes_never_truncate(f2 in arb_record::<F2<i64>>(), f3 in arb_record::<F3<i64>>()) {
        let shorter = fmap(|_| |v: i64| v, f2.clone()).unwrap();
        let applied = amap(shorter, f3.clone());
        prop_assert!(matches!(applied, Err(Error::ShapeMismatch { .. })), "amap gave {:?}", applied);

        let longer = fmap(|_| |v: i64| v, f3.clone()).unwrap();
        let applied = amap(longer, f2.clone());
        prop_assert!(matches!(applied, Err(Error::ShapeMismatch { .. })), "amap gave {:?}", applied);

        let gathered = gather((f2.clone(), f3.clone()));
        prop_assert!(matches!(gathered, Err(Error::ShapeMismatch { .. })), "gather gave {:?}", gathered);
        let gathered = gather((f3, f2));
        prop_assert!(matches!(gathered, Err(Error::ShapeMismatch { .. })), "gather gave {:?}", gathered);
    }

    #[test]
    fn construct_round_trips_through_names(g in arb_record::<G4<i64>>()) {
        let fields = names::<G4<i64>>().iter().copied().zip(values(&g).into_iter().copied());
        prop_assert_eq!(construct::<G4<i64>, _>(fields), Ok(g.clone()));

        let missing_w = names::<G4<i64>>()[..3].iter().copied().zip(values(&g).into_iter().copied());
        prop_assert_eq!(
            construct::<G4<i64>, _>(missing_w),
            Err(Error::Construction { record: "G4", fault: ConstructionFault::MissingField("w") })
        );
    }
}
