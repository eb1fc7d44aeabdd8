//! Lossless serde for floats that may be `NaN` or infinite.
//!
//! JSON has no literal for non-finite numbers (serde_json writes `null`, which
//! does not read back as `f64`). Non-finite values are written as the strings
//! `"NaN"`, `"inf"` and `"-inf"`; finite values stay plain numbers.
//!
//! Use with `#[serde(with = "crate::serde_float")]` on `f64` fields and
//! `#[serde(with = "crate::serde_float::vec")]` on `Vec<f64>` fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Num(f64),
    Text(String),
}

fn to_repr(v: f64) -> Repr {
    if v.is_finite() {
        Repr::Num(v)
    } else if v.is_nan() {
        Repr::Text("NaN".into())
    } else if v > 0.0 {
        Repr::Text("inf".into())
    } else {
        Repr::Text("-inf".into())
    }
}

fn from_repr<E: serde::de::Error>(r: Repr) -> Result<f64, E> {
    match r {
        Repr::Num(v) => Ok(v),
        Repr::Text(s) => match s.as_str() {
            "NaN" | "nan" => Ok(f64::NAN),
            "inf" | "+inf" | "Infinity" => Ok(f64::INFINITY),
            "-inf" | "-Infinity" => Ok(f64::NEG_INFINITY),
            other => Err(E::custom(format!("invalid float '{other}'"))),
        },
    }
}

pub fn serialize<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    to_repr(*v).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    from_repr(Repr::deserialize(deserializer)?)
}

pub mod vec {
    use super::*;

    pub fn serialize<S: Serializer>(v: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(v.iter().map(|&x| to_repr(x)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Repr>::deserialize(deserializer)?
            .into_iter()
            .map(from_repr::<D::Error>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "crate::serde_float")]
        pf: f64,
        #[serde(with = "crate::serde_float::vec")]
        values: Vec<f64>,
    }

    #[test]
    fn non_finite_values_survive_json() {
        let s = Sample {
            pf: f64::INFINITY,
            values: vec![f64::NAN, 1.5, f64::NEG_INFINITY],
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"pf":"inf","values":["NaN",1.5,"-inf"]}"#);

        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pf, f64::INFINITY);
        assert!(back.values[0].is_nan());
        assert_eq!(back.values[1], 1.5);
        assert_eq!(back.values[2], f64::NEG_INFINITY);
    }

    #[test]
    fn rejects_unknown_text() {
        let err = serde_json::from_str::<Sample>(r#"{"pf":"big","values":[]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid float"));
    }
}
