//! data model and aggregation algorithms for comparing spatial units (tract
//! centroids, parcel-average points, individual parcels) in a travel-time
//! accessibility analysis. no file I/O happens in this crate.
pub mod algorithm;
pub mod model;
