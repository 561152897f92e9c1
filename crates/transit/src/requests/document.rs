//! Structured document protocol.
//!
//! Input is an object with two arrays:
//!
//! ```text
//! {
//!   "base_requests": [
//!     {"type": "Stop", "name": "A", "latitude": 55.6, "longitude": 37.2,
//!      "road_distances": {"B": 3900}},
//!     {"type": "Bus", "name": "750", "stops": ["A", "B"], "is_roundtrip": false}
//!   ],
//!   "stat_requests": [
//!     {"type": "Bus", "name": "750", "id": 1},
//!     {"type": "Stop", "name": "A", "id": 2}
//!   ]
//! }
//! ```
//!
//! Output is an array with one object per stat request, in order.

use std::io::{Read, Write};

use crate::models::{Bus, Result, RouteKind, Stop};
use crate::requests::{BaseRequest, Batch, Outcome, RequestType, StatRequest, StatResponse};
use crate::value::{self, Object, Value, WriteOptions};

/// Decode a whole request document.
pub fn decode_batch(document: &Value) -> Result<Batch> {
    let base_requests = document
        .field("base_requests")?
        .as_array()?
        .iter()
        .map(decode_base_request)
        .collect::<Result<Vec<_>>>()?;

    let stat_requests = document
        .field("stat_requests")?
        .as_array()?
        .iter()
        .map(decode_stat_request)
        .collect::<Result<Vec<_>>>()?;

    Ok(Batch {
        base_requests,
        stat_requests,
    })
}

fn decode_base_request(request: &Value) -> Result<BaseRequest> {
    let name = request.field("name")?.as_str()?;

    match RequestType::from_tag(request.field("type")?.as_str()?)? {
        RequestType::Stop => {
            let mut stop = Stop::new(
                name,
                request.field("latitude")?.as_f64()?,
                request.field("longitude")?.as_f64()?,
            );
            if let Some(distances) = request.optional_field("road_distances")? {
                for (to, meters) in distances.as_object()? {
                    stop.add_road_distance(to.as_str(), meters.as_f64()?);
                }
            }
            Ok(BaseRequest::Stop(stop))
        }
        RequestType::Bus => {
            let stops = request
                .field("stops")?
                .as_array()?
                .iter()
                .map(Value::as_str)
                .collect::<Result<Vec<_>>>()?;
            let kind = RouteKind::from_roundtrip_flag(request.field("is_roundtrip")?.as_bool()?);
            Ok(BaseRequest::Bus(Bus::new(name, stops, kind)))
        }
    }
}

fn decode_stat_request(request: &Value) -> Result<StatRequest> {
    Ok(StatRequest {
        id: Some(request.field("id")?.as_i64()?),
        request_type: RequestType::from_tag(request.field("type")?.as_str()?)?,
        name: request.field("name")?.as_str()?.to_owned(),
    })
}

/// Encode responses as an array of response objects.
pub fn encode_responses(responses: &[StatResponse]) -> Value {
    responses.iter().map(encode_response).collect()
}

fn encode_response(response: &StatResponse) -> Value {
    let mut object = Object::new();
    if let Some(id) = response.id {
        object.insert("request_id".into(), Value::from(id));
    }

    match &response.outcome {
        Outcome::Bus(stats) => {
            object.insert("stop_count".into(), Value::from(stats.stop_count));
            object.insert("unique_stop_count".into(), Value::from(stats.unique_stop_count));
            object.insert("route_length".into(), Value::from(stats.route_length()));
            if let Some(curvature) = stats.curvature() {
                object.insert("curvature".into(), Value::from(curvature));
            }
        }
        Outcome::Stop(stats) => {
            let buses = stats.buses.iter().map(|bus| Value::from(bus.as_str())).collect();
            object.insert("buses".into(), buses);
        }
        Outcome::NotFound { .. } => {
            object.insert("error_message".into(), Value::from("not found"));
        }
    }

    Value::Object(object)
}

/// Read a request document, run it and write the response document
/// followed by a newline.
pub fn process_document<R: Read, W: Write>(reader: R, writer: &mut W, options: &WriteOptions) -> Result<()> {
    let document = value::from_reader(reader)?;
    let batch = decode_batch(&document)?;
    let responses = batch.execute()?;

    encode_responses(&responses).write_to(writer, options)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransitError;
    use approx::assert_relative_eq;

    const REQUESTS: &str = r#"{
      "base_requests": [
        {"type": "Stop", "road_distances": {"Marushkino": 3900}, "longitude": 37.20829, "name": "Tolstopaltsevo", "latitude": 55.611087},
        {"type": "Stop", "road_distances": {"Rasskazovka": 9900}, "longitude": 37.209755, "name": "Marushkino", "latitude": 55.595884},
        {"type": "Bus", "name": "256", "stops": ["Biryulyovo Zapadnoye", "Biryusinka", "Universam", "Biryulyovo Tovarnaya", "Biryulyovo Passazhirskaya", "Biryulyovo Zapadnoye"], "is_roundtrip": true},
        {"type": "Bus", "name": "750", "stops": ["Tolstopaltsevo", "Marushkino", "Rasskazovka"], "is_roundtrip": false},
        {"type": "Stop", "road_distances": {}, "longitude": 37.333324, "name": "Rasskazovka", "latitude": 55.632761},
        {"type": "Stop", "road_distances": {"Rossoshanskaya ulitsa": 7500, "Biryusinka": 1800, "Universam": 2400}, "longitude": 37.6517, "name": "Biryulyovo Zapadnoye", "latitude": 55.574371},
        {"type": "Stop", "road_distances": {"Universam": 750}, "longitude": 37.64839, "name": "Biryusinka", "latitude": 55.581065},
        {"type": "Stop", "road_distances": {"Rossoshanskaya ulitsa": 5600, "Biryulyovo Tovarnaya": 900}, "longitude": 37.645687, "name": "Universam", "latitude": 55.587655},
        {"type": "Stop", "road_distances": {"Biryulyovo Passazhirskaya": 1300}, "longitude": 37.653656, "name": "Biryulyovo Tovarnaya", "latitude": 55.592028},
        {"type": "Stop", "road_distances": {"Biryulyovo Zapadnoye": 1200}, "longitude": 37.659164, "name": "Biryulyovo Passazhirskaya", "latitude": 55.580999},
        {"type": "Bus", "name": "828", "stops": ["Biryulyovo Zapadnoye", "Universam", "Rossoshanskaya ulitsa", "Biryulyovo Zapadnoye"], "is_roundtrip": true},
        {"type": "Stop", "road_distances": {}, "longitude": 37.605757, "name": "Rossoshanskaya ulitsa", "latitude": 55.595579},
        {"type": "Stop", "road_distances": {}, "longitude": 37.603831, "name": "Prazhskaya", "latitude": 55.611678}
      ],
      "stat_requests": [
        {"type": "Bus", "name": "256", "id": 1965312327},
        {"type": "Bus", "name": "750", "id": 519139350},
        {"type": "Bus", "name": "751", "id": 194217464},
        {"type": "Stop", "name": "Samara", "id": 746888088},
        {"type": "Stop", "name": "Prazhskaya", "id": 65100610},
        {"type": "Stop", "name": "Biryulyovo Zapadnoye", "id": 1042838872}
      ]
    }"#;

    fn run(input: &str) -> Result<Value> {
        let mut output = Vec::new();
        process_document(input.as_bytes(), &mut output, &WriteOptions::default())?;
        let text = String::from_utf8(output).expect("response is UTF-8");
        assert!(text.ends_with('\n'));
        value::parse(&text)
    }

    #[test]
    fn test_full_document() {
        let responses = run(REQUESTS).unwrap();
        let responses = responses.as_array().unwrap();
        assert_eq!(responses.len(), 6);

        let bus_256 = &responses[0];
        assert_eq!(bus_256.field("request_id").unwrap().as_i64().unwrap(), 1965312327);
        assert_eq!(bus_256.field("stop_count").unwrap().as_f64().unwrap(), 6.0);
        assert_eq!(bus_256.field("unique_stop_count").unwrap().as_f64().unwrap(), 5.0);
        assert_eq!(bus_256.field("route_length").unwrap().as_f64().unwrap(), 5950.0);
        assert_relative_eq!(bus_256.field("curvature").unwrap().as_f64().unwrap(), 1.361239, epsilon = 1e-6);

        let bus_750 = &responses[1];
        assert_eq!(bus_750.field("stop_count").unwrap().as_f64().unwrap(), 5.0);
        assert_eq!(bus_750.field("unique_stop_count").unwrap().as_f64().unwrap(), 3.0);
        assert_eq!(bus_750.field("route_length").unwrap().as_f64().unwrap(), 27600.0);
        assert_relative_eq!(bus_750.field("curvature").unwrap().as_f64().unwrap(), 1.318084, epsilon = 1e-6);

        assert_eq!(
            responses[2].to_string(),
            r#"{"error_message":"not found","request_id":194217464}"#
        );
        assert_eq!(
            responses[3].to_string(),
            r#"{"error_message":"not found","request_id":746888088}"#
        );
        assert_eq!(responses[4].to_string(), r#"{"buses":[],"request_id":65100610}"#);
        assert_eq!(
            responses[5].to_string(),
            r#"{"buses":["256","828"],"request_id":1042838872}"#
        );
    }

    #[test]
    fn test_roundtrip_flag_polarity() {
        let input = r#"{
          "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0, "road_distances": {"B": 100}},
            {"type": "Stop", "name": "B", "latitude": 55.001, "longitude": 37.0, "road_distances": {"A": 100}},
            {"type": "Bus", "name": "loop", "stops": ["A", "B", "A"], "is_roundtrip": true},
            {"type": "Bus", "name": "line", "stops": ["A", "B", "A"], "is_roundtrip": false}
          ],
          "stat_requests": [
            {"type": "Bus", "name": "loop", "id": 1},
            {"type": "Bus", "name": "line", "id": 2}
          ]
        }"#;

        let responses = run(input).unwrap();
        let responses = responses.as_array().unwrap();
        assert_eq!(responses[0].field("stop_count").unwrap().as_f64().unwrap(), 3.0);
        assert_eq!(responses[0].field("route_length").unwrap().as_f64().unwrap(), 200.0);
        assert_eq!(responses[1].field("stop_count").unwrap().as_f64().unwrap(), 5.0);
        assert_eq!(responses[1].field("route_length").unwrap().as_f64().unwrap(), 400.0);
    }

    #[test]
    fn test_missing_road_distance_omits_curvature() {
        let input = r#"{
          "base_requests": [
            {"type": "Bus", "name": "750", "stops": ["Tolstopaltsevo", "Marushkino", "Rasskazovka"], "is_roundtrip": false},
            {"type": "Stop", "name": "Tolstopaltsevo", "latitude": 55.611087, "longitude": 37.20829},
            {"type": "Stop", "name": "Marushkino", "latitude": 55.595884, "longitude": 37.209755},
            {"type": "Stop", "name": "Rasskazovka", "latitude": 55.632761, "longitude": 37.333324}
          ],
          "stat_requests": [{"type": "Bus", "name": "750", "id": 3}]
        }"#;

        let responses = run(input).unwrap();
        let bus = &responses.as_array().unwrap()[0];
        assert!(bus.optional_field("curvature").unwrap().is_none());
        assert_relative_eq!(bus.field("route_length").unwrap().as_f64().unwrap(), 20939.5, epsilon = 0.5);
    }

    #[test]
    fn test_unknown_base_request_type_is_fatal() {
        let input = r#"{"base_requests": [{"type": "Tram", "name": "T1"}], "stat_requests": []}"#;
        assert!(matches!(run(input), Err(TransitError::UnknownRequestType(tag)) if tag == "Tram"));
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let mut output = Vec::new();
        let err = process_document(&b"{\"base_requests\": [}"[..], &mut output, &WriteOptions::default()).unwrap_err();

        assert!(matches!(err, TransitError::Parse { .. }));
        assert!(output.is_empty());
    }

    #[test]
    fn test_wrong_field_types() {
        let input = r#"{"base_requests": [{"type": "Bus", "name": "1", "stops": ["A", 2], "is_roundtrip": true}], "stat_requests": []}"#;
        assert!(matches!(run(input), Err(TransitError::TypeMismatch { .. })));

        let input = r#"{"base_requests": [{"type": "Bus", "name": "1", "stops": []}], "stat_requests": []}"#;
        assert!(matches!(run(input), Err(TransitError::MissingField("is_roundtrip"))));

        let input = r#"{"base_requests": []}"#;
        assert!(matches!(run(input), Err(TransitError::MissingField("stat_requests"))));
    }

    #[test]
    fn test_empty_batch() {
        let responses = run(r#"{"base_requests": [], "stat_requests": []}"#).unwrap();
        assert!(responses.as_array().unwrap().is_empty());
    }
}
