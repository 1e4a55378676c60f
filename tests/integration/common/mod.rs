//! Record fixtures and helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Once, OnceLock};

use graft::{GeoPoint, Record, Scalar, Schema};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("graft=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    });
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Place {
    pub id: i64,
    pub name: String,
}

impl Place {
    pub fn new(id: i64, name: &str) -> Self {
        Place {
            id,
            name: name.to_owned(),
        }
    }
}

impl Record for Place {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder::<Place>("Place")
                .scalar("Id", |p| &p.id, |p| &mut p.id)
                .graph_tag("uid")
                .scalar("Name", |p| &p.name, |p| &mut p.name)
                .serde_tag("name")
                .graph_tag("name")
                .build()
        })
    }
}

/// Plain scalars only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dog1 {
    pub id: i64,
    pub name: String,
    pub color: String,
}

impl Record for Dog1 {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder::<Dog1>("Dog")
                .scalar("Id", |d| &d.id, |d| &mut d.id)
                .graph_tag("uid")
                .scalar("Name", |d| &d.name, |d| &mut d.name)
                .graph_tag("name")
                .scalar("Color", |d| &d.color, |d| &mut d.color)
                .serde_tag("color")
                .graph_tag("color")
                .build()
        })
    }
}

/// Every field shape at once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dog {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub likes: Vec<Place>,
    pub nicknames: Vec<String>,
    pub lives_at: Place,
    pub born_at: Option<Box<Place>>,
}

impl Record for Dog {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder::<Dog>("Dog")
                .scalar("Id", |d| &d.id, |d| &mut d.id)
                .graph_tag("uid")
                .scalar("Name", |d| &d.name, |d| &mut d.name)
                .graph_tag("name")
                .scalar("Color", |d| &d.color, |d| &mut d.color)
                .serde_tag("color")
                .graph_tag("color")
                .relations("Likes", |d| &d.likes, |d| &mut d.likes)
                .graph_tag("likes_places")
                .scalars("Nicknames", |d| &d.nicknames, |d| &mut d.nicknames)
                .graph_tag("nicknames")
                .relation("LivesAt", |d| &d.lives_at, |d| &mut d.lives_at)
                .graph_tag("lives_at")
                .relation_ref("BornAt", |d| &d.born_at, |d| &mut d.born_at)
                .graph_tag("born_at")
                .build()
        })
    }
}

pub fn full_dog() -> Dog {
    Dog {
        id: 1,
        name: "jarvis".into(),
        color: Some("white".into()),
        likes: vec![Place::new(1, "Pune"), Place::new(2, "Mumbai")],
        nicknames: vec!["chotu".into(), "motu".into()],
        lives_at: Place::new(1, "Pune"),
        born_at: Some(Box::new(Place::new(3, "Solapur"))),
    }
}

/// Boxed relation collection and optional primitive elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Kennel {
    pub code: String,
    pub dogs: Vec<Box<Dog1>>,
    pub ratings: Vec<Option<i64>>,
}

impl Record for Kennel {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder::<Kennel>("Kennel")
                .scalar("Code", |k| &k.code, |k| &mut k.code)
                .serde_tag("uid")
                .relation_refs("Dogs", |k| &k.dogs, |k| &mut k.dogs)
                .serde_tag("dogs")
                .scalars("Ratings", |k| &k.ratings, |k| &mut k.ratings)
                .serde_tag("ratings")
                .build()
        })
    }
}

/// Naming precedence and exclusion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tagged {
    pub id: String,
    pub both: String,
    pub serde_only: String,
    pub plain: String,
    pub hidden: String,
}

impl Record for Tagged {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder::<Tagged>("Tagged")
                .scalar("Id", |t| &t.id, |t| &mut t.id)
                .graph_tag("uid")
                .scalar("Both", |t| &t.both, |t| &mut t.both)
                .graph_tag("graph_name")
                .serde_tag("serde_name")
                .scalar("SerdeOnly", |t| &t.serde_only, |t| &mut t.serde_only)
                .serde_tag("serde_only")
                .scalar("Plain", |t| &t.plain, |t| &mut t.plain)
                .scalar("Hidden", |t| &t.hidden, |t| &mut t.hidden)
                .graph_tag("-")
                .build()
        })
    }
}

/// Every scalar kind the codec supports.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub sensor: String,
    pub count: u32,
    pub delta: i8,
    pub ratio: f64,
    pub gain: f32,
    pub ok: bool,
    pub raw: Vec<u8>,
    pub taken_at: OffsetDateTime,
    pub location: GeoPoint,
}

impl Default for Reading {
    fn default() -> Self {
        Reading {
            sensor: String::new(),
            count: 0,
            delta: 0,
            ratio: 0.0,
            gain: 0.0,
            ok: false,
            raw: Vec::new(),
            taken_at: OffsetDateTime::UNIX_EPOCH,
            location: GeoPoint::default(),
        }
    }
}

impl Record for Reading {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder::<Reading>("Reading")
                .scalar("Sensor", |r| &r.sensor, |r| &mut r.sensor)
                .graph_tag("sensor")
                .scalar("Count", |r| &r.count, |r| &mut r.count)
                .graph_tag("count")
                .scalar("Delta", |r| &r.delta, |r| &mut r.delta)
                .graph_tag("delta")
                .scalar("Ratio", |r| &r.ratio, |r| &mut r.ratio)
                .graph_tag("ratio")
                .scalar("Gain", |r| &r.gain, |r| &mut r.gain)
                .graph_tag("gain")
                .scalar("Ok", |r| &r.ok, |r| &mut r.ok)
                .graph_tag("ok")
                .scalar("Raw", |r| &r.raw, |r| &mut r.raw)
                .graph_tag("raw")
                .scalar("TakenAt", |r| &r.taken_at, |r| &mut r.taken_at)
                .graph_tag("taken_at")
                .scalar("Location", |r| &r.location, |r| &mut r.location)
                .graph_tag("location")
                .build()
        })
    }

    fn identity(&self) -> Option<Scalar> {
        Some(Scalar::String(format!("reading-{}", self.sensor)))
    }
}

/// No identity field and no identity method.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Note {
    pub text: String,
}

impl Record for Note {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder::<Note>("Note")
                .scalar("Text", |n| &n.text, |n| &mut n.text)
                .graph_tag("text")
                .build()
        })
    }
}

/// Collections of non-primitive elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trail {
    pub id: i64,
    pub name: String,
    pub stamps: Vec<OffsetDateTime>,
    pub stops: Vec<GeoPoint>,
}

impl Record for Trail {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder::<Trail>("Trail")
                .scalar("Id", |t| &t.id, |t| &mut t.id)
                .graph_tag("uid")
                .scalar("Name", |t| &t.name, |t| &mut t.name)
                .graph_tag("name")
                .scalars("Stamps", |t| &t.stamps, |t| &mut t.stamps)
                .graph_tag("stamps")
                .scalars("Stops", |t| &t.stops, |t| &mut t.stops)
                .graph_tag("stops")
                .build()
        })
    }
}
