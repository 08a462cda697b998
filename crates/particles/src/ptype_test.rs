use crate::ptype::{ParticleType, NTYPES};

#[test]
fn indices_round_trip() {
    for i in 0..NTYPES {
        let ptype = ParticleType::from_index(i).unwrap();
        assert_eq!(ptype.index(), i);
    }
}

#[test]
fn out_of_range_index_is_none() {
    assert_eq!(ParticleType::from_index(NTYPES), None);
    assert_eq!(ParticleType::from_index(usize::MAX), None);
}

#[test]
fn all_lists_every_species_once() {
    assert_eq!(ParticleType::ALL.len(), NTYPES);
    for (i, ptype) in ParticleType::ALL.iter().enumerate() {
        assert_eq!(ptype.index(), i);
    }
}
