use super::{ModelError, TractId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

const PARCEL_KEY_MULTIPLIER: u64 = 10_000;

/// largest local sequence number that still fits below the next tract's key range
pub const MAX_PARCELS_PER_TRACT: u32 = (PARCEL_KEY_MULTIPLIER - 1) as u32;

/// composite parcel identifier `tract_id * 10000 + local_sequence`, written to
/// files as `new_index`.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct ParcelKey(pub u64);

impl ParcelKey {
    pub fn new(tract_id: TractId, local_sequence: u32) -> Result<ParcelKey, ModelError> {
        if local_sequence == 0 {
            return Err(ModelError::InvalidLocalSequence(tract_id));
        }
        if local_sequence > MAX_PARCELS_PER_TRACT {
            return Err(ModelError::ParcelCapacityExceeded {
                tract: tract_id,
                max: MAX_PARCELS_PER_TRACT,
                next: TractId(tract_id.0 + 1),
            });
        }
        Ok(ParcelKey(
            tract_id.as_u64() * PARCEL_KEY_MULTIPLIER + local_sequence as u64,
        ))
    }

    /// the tract encoded in the key by integer division
    pub fn encoded_tract_id(&self) -> TractId {
        TractId((self.0 / PARCEL_KEY_MULTIPLIER) as u32)
    }

    pub fn local_sequence(&self) -> u32 {
        (self.0 % PARCEL_KEY_MULTIPLIER) as u32
    }
}

impl Display for ParcelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// a residential parcel point matched to the tract containing it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Parcel {
    pub key: ParcelKey,
    pub tract_id: TractId,
    pub local_sequence: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub altparno: Option<String>,
    pub nparno: Option<String>,
    pub land_use: String,
}

/// assigns parcel keys to points already matched to a tract. output is grouped
/// by tract in ascending id order; within a tract, points keep their input order
/// and receive local sequence numbers 1, 2, 3, ...
pub fn assign_parcel_keys<T>(
    matched: impl IntoIterator<Item = (TractId, T)>,
) -> Result<Vec<(ParcelKey, T)>, ModelError> {
    let mut groups: BTreeMap<TractId, Vec<T>> = BTreeMap::new();
    for (tract_id, item) in matched {
        groups.entry(tract_id).or_default().push(item);
    }
    let mut result = vec![];
    for (tract_id, items) in groups.into_iter() {
        for (idx, item) in items.into_iter().enumerate() {
            let key = ParcelKey::new(tract_id, idx as u32 + 1)?;
            result.push((key, item));
        }
    }
    Ok(result)
}

/// resolves the parent tract of a parcel key. uses the explicit parcel table
/// when one was loaded and falls back to decoding the key otherwise.
#[derive(Debug, Clone, Default)]
pub struct ParcelTractLookup {
    explicit: HashMap<ParcelKey, TractId>,
}

impl ParcelTractLookup {
    pub fn new(pairs: impl IntoIterator<Item = (ParcelKey, TractId)>) -> ParcelTractLookup {
        ParcelTractLookup {
            explicit: pairs.into_iter().collect(),
        }
    }

    pub fn decode_only() -> ParcelTractLookup {
        ParcelTractLookup::default()
    }

    pub fn is_explicit(&self) -> bool {
        !self.explicit.is_empty()
    }

    pub fn resolve(&self, key: ParcelKey) -> Result<TractId, ModelError> {
        let encoded = key.encoded_tract_id();
        match self.explicit.get(&key) {
            None => Ok(encoded),
            Some(recorded) if *recorded == encoded => Ok(encoded),
            Some(recorded) => Err(ModelError::InconsistentParcelKey {
                key,
                recorded: *recorded,
                encoded,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_key_encodes_tract() {
        let key = ParcelKey::new(TractId(12), 345).unwrap();
        assert_eq!(key, ParcelKey(120345));
        assert_eq!(key.encoded_tract_id(), TractId(12));
        assert_eq!(key.local_sequence(), 345);
    }

    #[test]
    fn test_key_capacity() {
        assert!(ParcelKey::new(TractId(1), MAX_PARCELS_PER_TRACT).is_ok());
        let result = ParcelKey::new(TractId(1), MAX_PARCELS_PER_TRACT + 1);
        assert!(matches!(
            result,
            Err(ModelError::ParcelCapacityExceeded { next: TractId(2), .. })
        ));
        assert!(ParcelKey::new(TractId(1), 0).is_err());
    }

    #[test]
    fn test_local_sequences_dense_and_restart_per_tract() {
        let matched = vec![
            (TractId(2), "a"),
            (TractId(1), "b"),
            (TractId(2), "c"),
            (TractId(1), "d"),
            (TractId(2), "e"),
        ];
        let keyed = assign_parcel_keys(matched).unwrap();
        let grouped = keyed
            .iter()
            .map(|(k, v)| (k.encoded_tract_id(), (k.local_sequence(), *v)))
            .into_group_map();
        assert_eq!(grouped[&TractId(1)], vec![(1, "b"), (2, "d")]);
        assert_eq!(grouped[&TractId(2)], vec![(1, "a"), (2, "c"), (3, "e")]);
        // grouped by ascending tract
        let order = keyed.iter().map(|(k, _)| k.0).collect_vec();
        assert_eq!(order, vec![10001, 10002, 20001, 20002, 20003]);
    }

    #[test]
    fn test_lookup_detects_inconsistent_keys() {
        let lookup = ParcelTractLookup::new(vec![
            (ParcelKey(10001), TractId(1)),
            (ParcelKey(20001), TractId(3)),
        ]);
        assert_eq!(lookup.resolve(ParcelKey(10001)).unwrap(), TractId(1));
        assert_eq!(lookup.resolve(ParcelKey(50002)).unwrap(), TractId(5));
        assert!(lookup.resolve(ParcelKey(20001)).is_err());
        assert_eq!(
            ParcelTractLookup::decode_only()
                .resolve(ParcelKey(20001))
                .unwrap(),
            TractId(2)
        );
    }
}
