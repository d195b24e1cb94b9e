use super::CoordinateSystem;
use crate::model::spatial::SpatialError;
use regex::Regex;
use std::collections::HashMap;

const US_SURVEY_FOOT: f64 = 1200.0 / 3937.0;
const INTERNATIONAL_FOOT: f64 = 0.3048;

/// reads the coordinate system of an ESRI `.prj` sidecar. geographic systems,
/// web mercator, lambert conformal conic and transverse mercator projections
/// are recognized and turned into a proj definition.
pub fn parse_prj(wkt: &str) -> Result<CoordinateSystem, SpatialError> {
    let text = wkt.trim();
    if text.starts_with("GEOGCS") {
        return Ok(CoordinateSystem::Geographic);
    }
    if !text.starts_with("PROJCS") {
        return Err(SpatialError::UnsupportedCrs(truncate(text)));
    }
    let name = capture(text, r#"^PROJCS\["([^"]+)""#)?.unwrap_or_else(|| truncate(text));
    let projection = capture(text, r#"PROJECTION\["([^"]+)"\]"#)?
        .ok_or_else(|| SpatialError::UnsupportedCrs(truncate(text)))?;
    let lower = projection.to_lowercase();
    if lower.contains("mercator_auxiliary_sphere")
        || lower.contains("pseudo")
        || lower.contains("web_mercator")
    {
        return CoordinateSystem::from_epsg(3857);
    }

    let params = capture_parameters(text)?;
    let param = |key: &str| -> Result<f64, SpatialError> {
        params
            .get(key)
            .copied()
            .ok_or_else(|| SpatialError::UnsupportedCrs(format!("{projection} without {key}")))
    };
    let linear_unit = capture_linear_unit(text)?;
    // proj wants false easting and northing in metres
    let false_easting = param("false_easting")? * linear_unit;
    let false_northing = param("false_northing")? * linear_unit;
    let projection_terms = if lower.starts_with("lambert_conformal_conic") {
        let standard_parallel_1 = param("standard_parallel_1")?;
        let standard_parallel_2 = param("standard_parallel_2").unwrap_or(standard_parallel_1);
        format!(
            "+proj=lcc +lat_1={standard_parallel_1} +lat_2={standard_parallel_2} +lat_0={} +lon_0={}",
            param("latitude_of_origin")?,
            param("central_meridian")?,
        )
    } else if lower == "transverse_mercator" {
        format!(
            "+proj=tmerc +lat_0={} +lon_0={} +k_0={}",
            param("latitude_of_origin")?,
            param("central_meridian")?,
            param("scale_factor")?,
        )
    } else {
        return Err(SpatialError::UnsupportedCrs(projection));
    };
    let definition = format!(
        "{projection_terms} +x_0={false_easting} +y_0={false_northing} {} {} +no_defs",
        ellipsoid_terms(text)?,
        unit_terms(linear_unit),
    );
    Ok(CoordinateSystem::Projected { name, definition })
}

fn capture(text: &str, pattern: &str) -> Result<Option<String>, SpatialError> {
    let re = regex(pattern)?;
    Ok(re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string()))
}

fn capture_parameters(text: &str) -> Result<HashMap<String, f64>, SpatialError> {
    let re = regex(r#"PARAMETER\["([^"]+)",\s*([-+0-9.eE]+)\]"#)?;
    let mut params = HashMap::new();
    for cap in re.captures_iter(text) {
        if let Ok(value) = cap[2].parse::<f64>() {
            params.insert(cap[1].to_lowercase(), value);
        }
    }
    Ok(params)
}

/// the last UNIT of a PROJCS is the linear unit, earlier ones belong to the
/// geographic system
fn capture_linear_unit(text: &str) -> Result<f64, SpatialError> {
    let re = regex(r#"UNIT\["[^"]*",\s*([-+0-9.eE]+)"#)?;
    let unit = re
        .captures_iter(text)
        .last()
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(1.0);
    Ok(unit)
}

fn ellipsoid_terms(text: &str) -> Result<String, SpatialError> {
    let re = regex(r#"SPHEROID\["[^"]*",\s*([-+0-9.eE]+),\s*([-+0-9.eE]+)"#)?;
    let terms = re
        .captures(text)
        .and_then(|c| {
            let a = c[1].parse::<f64>().ok()?;
            let inverse_flattening = c[2].parse::<f64>().ok()?;
            Some(format!("+a={a} +rf={inverse_flattening}"))
        })
        .unwrap_or_else(|| String::from("+ellps=GRS80"));
    Ok(terms)
}

fn unit_terms(linear_unit: f64) -> String {
    if (linear_unit - 1.0).abs() < 1e-12 {
        String::from("+units=m")
    } else if (linear_unit - US_SURVEY_FOOT).abs() < 1e-12 {
        String::from("+units=us-ft")
    } else if (linear_unit - INTERNATIONAL_FOOT).abs() < 1e-12 {
        String::from("+units=ft")
    } else {
        format!("+to_meter={linear_unit}")
    }
}

fn regex(pattern: &str) -> Result<Regex, SpatialError> {
    Regex::new(pattern).map_err(|e| SpatialError::UnsupportedCrs(e.to_string()))
}

fn truncate(text: &str) -> String {
    text.chars().take(60).collect()
}
