#![forbid(unsafe_code)]

//! Fluent navigation and editing of XML documents.
//!
//! Parse a [`Document`], take its [`Document::root`], and walk it with
//! [`Node`]s. Lookups come in two flavors: strict ones like [`Node::child`]
//! return an error when nothing is found, while `try_` ones return a
//! placeholder node or an absent [`Value`] you can keep chaining on.
//!
//! ```rust
//! use fluxml::Document;
//!
//! let doc = Document::parse(r#"<server><listen port="8080"/><name>demo</name></server>"#)?;
//! let root = doc.root();
//!
//! let port = root.child("listen")?.attr("port").value().as_u16()?;
//! assert_eq!(port, 8080);
//!
//! // nothing there, but no error either
//! let timeout = root.try_child("limits").attr("timeout").value().as_enum(30u32);
//! assert_eq!(timeout, 30);
//!
//! root.child("name")?.set_text("production")?;
//! root.add_child("debug")?.set_attr("enabled", false)?;
//! assert!(!root.child("debug")?.attr("enabled").value().as_bool()?);
//! # Ok::<(), fluxml::Error>(())
//! ```
//!
//! Changes made through any node are visible in the document, and
//! [`Document::to_text`], [`Document::write_to`] and [`Document::save`]
//! serialize its current state as configured by [`output::Parameters`].

mod access;
mod attribute;
mod creation;
mod document;
mod encoding;
mod entity;
mod error;
mod idmap;
mod manipulation;
mod name;
mod node;
pub mod output;
mod parse;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest;
mod tree;
pub mod typeref;
mod value;
mod xmlnode;

pub use attribute::Attribute;
pub use document::Document;
pub use error::{Error, ErrorKind, ParseError, Span};
pub use node::Node;
pub use typeref::{TypeHandle, TypeRegistry};
pub use value::Value;
