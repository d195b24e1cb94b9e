use geo::{BoundingRect, Intersects, MultiPolygon, Point};
use rstar::{RTree, RTreeObject, AABB};
use tractaccess_core::model::TractId;

/// a tract polygon stored in the R-tree
struct TractEntry {
    id: TractId,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for TractEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// point-in-polygon lookups of parcels against the tracts of one county
pub struct TractIndex {
    tree: RTree<TractEntry>,
}

impl TractIndex {
    pub fn new(tracts: Vec<(TractId, MultiPolygon<f64>)>) -> TractIndex {
        let entries = tracts
            .into_iter()
            .filter_map(|(id, polygon)| {
                let rect = polygon.bounding_rect()?;
                let envelope =
                    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
                Some(TractEntry {
                    id,
                    envelope,
                    polygon,
                })
            })
            .collect();
        TractIndex {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// the tract containing the point. boundaries count as inside: a point on
    /// a tract's outer edge is kept rather than dropped as a strict `within`
    /// test would do, and a point on a shared boundary belongs to every
    /// adjacent tract and resolves to the one with the smallest id.
    pub fn locate(&self, longitude: f64, latitude: f64) -> Option<TractId> {
        let point = Point::new(longitude, latitude);
        let query_env = AABB::from_point([longitude, latitude]);
        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.intersects(&point))
            .map(|entry| entry.id)
            .min()
    }
}
