use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use encoding_rs::Encoding;
use indextree::NodeId;
use tracing::{debug, instrument};

use crate::encoding::{decode, encode};
use crate::error::{Error, ParseError};
use crate::name::check_name;
use crate::node::Node;
use crate::output::{Parameters, XmlSerializer};
use crate::parse::parse;
use crate::tree::Tree;

/// A parsed XML document.
///
/// The document owns the tree; [`Document::root`] gives you a [`Node`] for
/// the document element, from which you navigate and make changes.
///
/// ```rust
/// use fluxml::output::{LineSeparator, Parameters};
/// use fluxml::Document;
///
/// let doc = Document::parse("<root><data foo=\"bar\">hi</data></root>")?;
/// let data = doc.root().child("data")?;
/// assert_eq!(data.attr("foo").value().as_str()?, "bar");
/// assert_eq!(data.text().as_str()?, "hi");
///
/// data.set_text("bye")?;
/// let text = doc.to_text(&Parameters {
///     line_separator: LineSeparator::Lf,
///     ..Default::default()
/// });
/// assert_eq!(
///     text,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <data foo=\"bar\">bye</data>\n</root>\n"
/// );
/// # Ok::<(), fluxml::Error>(())
/// ```
pub struct Document {
    tree: Rc<RefCell<Tree>>,
    root: NodeId,
    document_element: NodeId,
}

impl Document {
    fn from_tree(tree: Tree, root: NodeId) -> Result<Self, Error> {
        let document_element = tree
            .document_element(root)
            .ok_or(ParseError::NoRootElement)?;
        Ok(Document {
            tree: Rc::new(RefCell::new(tree)),
            root,
            document_element,
        })
    }

    /// Parse a document from text.
    pub fn parse(xml: &str) -> Result<Self, Error> {
        debug!(len = xml.len(), "parsing document");
        let mut tree = Tree::new();
        let root = parse(&mut tree, xml)?;
        Self::from_tree(tree, root)
    }

    /// Parse a document from bytes.
    ///
    /// The charset is taken from a byte order mark if there is one, then
    /// from the XML declaration. Without either, UTF-8 is assumed.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        Self::decode_and_parse(data, None)
    }

    /// Parse a document from bytes in a known charset. A byte order mark
    /// still takes precedence.
    pub fn from_bytes_with_encoding(
        data: &[u8],
        encoding: &'static Encoding,
    ) -> Result<Self, Error> {
        Self::decode_and_parse(data, Some(encoding))
    }

    fn decode_and_parse(data: &[u8], encoding: Option<&'static Encoding>) -> Result<Self, Error> {
        let (xml, used) = decode(data, encoding)?;
        debug!(encoding = used.name(), "decoded input");
        Self::parse(&xml)
    }

    /// Read everything from `reader` and parse it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let data = read_all(reader)?;
        Self::from_bytes(&data)
    }

    pub fn from_reader_with_encoding<R: Read>(
        reader: R,
        encoding: &'static Encoding,
    ) -> Result<Self, Error> {
        let data = read_all(reader)?;
        Self::from_bytes_with_encoding(&data, encoding)
    }

    /// Read and parse a file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// A document holding just an empty element with this name.
    pub fn new(root_name: &str) -> Result<Self, Error> {
        check_name(root_name)?;
        let mut tree = Tree::new();
        let root = tree.new_root();
        let element = tree.new_element(root_name);
        tree.append(root, element)?;
        Self::from_tree(tree, root)
    }

    /// The document element.
    pub fn root(&self) -> Node {
        Node::bound(self.tree.clone(), self.document_element)
    }

    /// Serialize to text, declaration included.
    ///
    /// The declaration names `parameters.encoding`, but the text itself is
    /// not encoded; see [`Document::to_bytes`].
    pub fn to_text(&self, parameters: &Parameters) -> String {
        debug!(
            format = ?parameters.format,
            encoding = parameters.encoding.name(),
            "serializing document"
        );
        let tree = self.tree.borrow();
        let text = XmlSerializer::new(&tree, parameters).serialize_document(self.root);
        text
    }

    /// Serialize and encode.
    pub fn to_bytes(&self, parameters: &Parameters) -> Vec<u8> {
        let text = self.to_text(parameters);
        encode(&text, parameters.encoding).into_owned()
    }

    /// Serialize, encode and write to `writer`, then flush it.
    pub fn write_to<W: Write>(&self, mut writer: W, parameters: &Parameters) -> Result<(), Error> {
        writer.write_all(&self.to_bytes(parameters))?;
        writer.flush()?;
        Ok(())
    }

    /// Write to a file, replacing what was there.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save<P: AsRef<Path>>(&self, path: P, parameters: &Parameters) -> Result<(), Error> {
        let file = File::create(path.as_ref())?;
        self.write_to(BufWriter::new(file), parameters)
    }
}

fn read_all<R: Read>(mut reader: R) -> Result<Vec<u8>, Error> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(data)
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(&Parameters::default()))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root().tag_name())
            .finish()
    }
}
