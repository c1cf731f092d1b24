use indextree::NodeId;
use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

use crate::access::is_whitespace_only;
use crate::entity::{normalize_newlines, parse_attribute, parse_entities};
use crate::error::{Error, ParseError, Span};
use crate::tree::Tree;

// an element whose start tag is still being read
struct PendingElement {
    name: String,
    span: Span,
    attributes: Vec<(String, String)>,
}

struct DocumentBuilder<'t> {
    tree: &'t mut Tree,
    root: NodeId,
    current: NodeId,
    open: Vec<(String, Span)>,
    pending: Option<PendingElement>,
    has_document_element: bool,
}

fn qualified_name(prefix: StrSpan, local: StrSpan) -> String {
    if prefix.as_str().is_empty() {
        local.as_str().to_string()
    } else {
        format!("{}:{}", prefix.as_str(), local.as_str())
    }
}

fn name_span(prefix: StrSpan, local: StrSpan) -> Span {
    if prefix.as_str().is_empty() {
        Span::from_strspan(local)
    } else {
        Span::new(prefix.start(), local.end())
    }
}

impl<'t> DocumentBuilder<'t> {
    fn new(tree: &'t mut Tree) -> Self {
        let root = tree.new_root();
        DocumentBuilder {
            tree,
            root,
            current: root,
            open: Vec::new(),
            pending: None,
            has_document_element: false,
        }
    }

    fn element_start(&mut self, prefix: StrSpan, local: StrSpan) -> Result<(), ParseError> {
        let span = name_span(prefix, local);
        if self.current == self.root && self.has_document_element {
            return Err(ParseError::MultipleRootElements(span));
        }
        self.pending = Some(PendingElement {
            name: qualified_name(prefix, local),
            span,
            attributes: Vec::new(),
        });
        Ok(())
    }

    fn attribute(
        &mut self,
        prefix: StrSpan,
        local: StrSpan,
        value: StrSpan,
    ) -> Result<(), ParseError> {
        let name = qualified_name(prefix, local);
        let span = name_span(prefix, local);
        let value = parse_attribute(value.as_str(), Span::from_strspan(value))?.into_owned();
        // the tokenizer only emits attributes inside a start tag
        if let Some(pending) = self.pending.as_mut() {
            if pending.attributes.iter().any(|(n, _)| *n == name) {
                return Err(ParseError::DuplicateAttribute { name, span });
            }
            pending.attributes.push((name, value));
        }
        Ok(())
    }

    // create the pending element and attach it; returns its node
    fn add_pending(&mut self) -> Result<Option<NodeId>, Error> {
        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => return Ok(None),
        };
        let node = self.tree.new_element(&pending.name);
        for (name, value) in pending.attributes {
            let name_id = self.tree.add_name(&name);
            if let Some(element) = self.tree.element_mut(node) {
                element.set_attribute(name_id, value);
            }
        }
        self.tree.append(self.current, node)?;
        if self.current == self.root {
            self.has_document_element = true;
        }
        self.open.push((pending.name, pending.span));
        Ok(Some(node))
    }

    fn open_element(&mut self) -> Result<(), Error> {
        if let Some(node) = self.add_pending()? {
            self.current = node;
        }
        Ok(())
    }

    fn empty_element(&mut self) -> Result<(), Error> {
        if self.add_pending()?.is_some() {
            self.open.pop();
        }
        Ok(())
    }

    fn close_element(&mut self, prefix: StrSpan, local: StrSpan) -> Result<(), ParseError> {
        let found = qualified_name(prefix, local);
        let span = name_span(prefix, local);
        match self.open.pop() {
            Some((expected, _)) if expected == found => {}
            Some((expected, _)) => {
                return Err(ParseError::InvalidCloseTag {
                    expected,
                    found,
                    span,
                })
            }
            None => {
                return Err(ParseError::InvalidCloseTag {
                    expected: String::new(),
                    found,
                    span,
                })
            }
        }
        self.current = self.tree.parent(self.current).unwrap_or(self.root);
        Ok(())
    }

    fn text(&mut self, text: StrSpan) -> Result<(), Error> {
        if self.current == self.root {
            // whitespace between top-level items is not content
            return Ok(());
        }
        let normalized = normalize_newlines(text.as_str());
        let decoded = parse_entities(&normalized, Span::from_strspan(text))?;
        self.tree.append_text(self.current, &decoded)
    }

    fn cdata(&mut self, text: StrSpan) -> Result<(), Error> {
        if self.current == self.root && is_whitespace_only(text.as_str()) {
            return Ok(());
        }
        let normalized = normalize_newlines(text.as_str());
        self.tree.append_text(self.current, &normalized)
    }

    fn comment(&mut self, text: StrSpan) -> Result<(), Error> {
        let node = self.tree.new_comment(text.as_str());
        self.tree.append(self.current, node)
    }

    fn processing_instruction(
        &mut self,
        target: StrSpan,
        content: Option<StrSpan>,
    ) -> Result<(), Error> {
        let node = self
            .tree
            .new_processing_instruction(target.as_str(), content.map(|c| c.as_str()));
        self.tree.append(self.current, node)
    }

    fn finish(self) -> Result<NodeId, Error> {
        if let Some((_, span)) = self.open.first() {
            return Err(ParseError::UnclosedTag(*span).into());
        }
        if !self.has_document_element {
            return Err(ParseError::NoRootElement.into());
        }
        Ok(self.root)
    }
}

/// Parse markup into `tree`, returning the new document root.
pub(crate) fn parse(tree: &mut Tree, xml: &str) -> Result<NodeId, Error> {
    let xml = xml.strip_prefix('\u{FEFF}').unwrap_or(xml);
    let mut builder = DocumentBuilder::new(tree);

    for token in Tokenizer::from(xml) {
        match token? {
            Token::ElementStart { prefix, local, .. } => {
                builder.element_start(prefix, local)?;
            }
            Token::Attribute {
                prefix,
                local,
                value,
                ..
            } => {
                builder.attribute(prefix, local, value)?;
            }
            Token::ElementEnd { end, .. } => match end {
                ElementEnd::Open => builder.open_element()?,
                ElementEnd::Empty => builder.empty_element()?,
                ElementEnd::Close(prefix, local) => builder.close_element(prefix, local)?,
            },
            Token::Text { text } => builder.text(text)?,
            Token::Cdata { text, .. } => builder.cdata(text)?,
            Token::Comment { text, .. } => builder.comment(text)?,
            Token::ProcessingInstruction {
                target, content, ..
            } => builder.processing_instruction(target, content)?,
            Token::DtdStart { span, .. }
            | Token::EmptyDtd { span, .. }
            | Token::EntityDeclaration { span, .. }
            | Token::DtdEnd { span } => {
                return Err(ParseError::DtdUnsupported(Span::from_strspan(span)).into());
            }
            Token::Declaration { .. } => {}
        }
    }
    builder.finish()
}
