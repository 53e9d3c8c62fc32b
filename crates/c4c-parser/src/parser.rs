//! Recursive-descent parser for c4c sources.
//!
//! This module turns the token stream of an entry file into a
//! [`Workspace`] tree. The public entry points are [`Parser::run`] and
//! [`Parser::run_all`].
//!
//! `#include "file"` pragmas are expanded inside [`Parser::next_token`]: the
//! current stream is suspended on a stack and the included file's stream
//! takes over until its EOF. The grammar never sees the pragma or the inner
//! EOF.

use std::{mem, path::Path};

use indexmap::IndexMap;
use log::{debug, trace};

use c4c_core::{
    identifier::IdentifierString,
    model::{
        ChildHolding, Component, Container, Entity, EntityKind, Identifiable, Model, Person,
        Relationship, SoftwareSystem, Workspace,
    },
};

use crate::{
    error::{ExpectationError, LexError, ParseError, Result},
    keyword::Keyword,
    provider::Provider,
    strings::{dedent, split_tags, unquote},
    token::{Token, TokenKind},
    token_stream::TokenStream,
};

const INCLUDE_PRAGMA: &str = "#include";

/// Implicit source of relationships declared as `-> dest` or `this -> dest`.
const THIS: &str = "this";

const WORKSPACE_KEYWORDS: &[Keyword] = &[
    Keyword::Name,
    Keyword::Description,
    Keyword::Properties,
    Keyword::Model,
    Keyword::Views,
    Keyword::View,
];

const MODEL_KEYWORDS: &[Keyword] = &[Keyword::Person, Keyword::SoftwareSystem, Keyword::Group];

const PERSON_KEYWORDS: &[Keyword] = &[
    Keyword::Description,
    Keyword::Tags,
    Keyword::Url,
    Keyword::Properties,
    Keyword::Perspectives,
];

const SOFTWARE_SYSTEM_KEYWORDS: &[Keyword] = &[
    Keyword::Container,
    Keyword::Description,
    Keyword::Tags,
    Keyword::Url,
    Keyword::Properties,
    Keyword::Perspectives,
    Keyword::Group,
];

const CONTAINER_KEYWORDS: &[Keyword] = &[
    Keyword::Component,
    Keyword::Description,
    Keyword::Technology,
    Keyword::Tags,
    Keyword::Url,
    Keyword::Properties,
    Keyword::Perspectives,
    Keyword::Group,
];

const COMPONENT_KEYWORDS: &[Keyword] = &[
    Keyword::Description,
    Keyword::Technology,
    Keyword::Tags,
    Keyword::Url,
    Keyword::Properties,
    Keyword::Perspectives,
];

const RELATIONSHIP_KEYWORDS: &[Keyword] = &[
    Keyword::Tags,
    Keyword::Url,
    Keyword::Properties,
    Keyword::Perspectives,
    Keyword::Technology,
    Keyword::Description,
];

/// Element kinds that can be declared as children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Person,
    SoftwareSystem,
    Container,
    Component,
}

impl Element {
    fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Person => Some(Element::Person),
            Keyword::SoftwareSystem => Some(Element::SoftwareSystem),
            Keyword::Container => Some(Element::Container),
            Keyword::Component => Some(Element::Component),
            _ => None,
        }
    }
}

/// Element keywords among `allowed`.
fn element_keywords(allowed: &[Keyword]) -> impl Iterator<Item = Keyword> + '_ {
    allowed
        .iter()
        .copied()
        .filter(|keyword| Element::from_keyword(*keyword).is_some())
}

/// A positional argument of a short declaration.
enum Slot<'e> {
    Text(&'e mut String),
    Tags(&'e mut Vec<String>),
}

/// Parses one compilation unit.
///
/// A parser is single-use: it is built by [`Parser::run`] or
/// [`Parser::run_all`] and dropped when they return.
pub struct Parser<'p> {
    provider: &'p mut dyn Provider,
    /// The stream tokens are currently read from.
    stream: TokenStream,
    /// Streams suspended by `#include`, innermost last, each with the token
    /// that was current when it was suspended.
    suspended: Vec<(TokenStream, Option<Token>)>,
    current: Option<Token>,
    previous: Option<Token>,
    can_backup: bool,
    /// Identifiers read ahead of the `=` that binds them.
    held: Vec<IdentifierString>,
    group: Option<String>,
    unique_id: usize,
    file: String,
}

impl<'p> Parser<'p> {
    /// Parses `target` as exactly one workspace followed by the end of input.
    ///
    /// Parent links are resolved before the workspace is returned.
    ///
    /// # Errors
    ///
    /// Returns the first lexical, grammatical, semantic or provider error.
    ///
    /// # Examples
    ///
    /// ```
    /// use c4c_core::model::Identifiable;
    /// use c4c_parser::{CachingProvider, MemoryLoader, Parser};
    ///
    /// let source = "workspace 'Shop' {\n  model {\n    user = person 'User'\n  }\n}\n";
    /// let mut provider =
    ///     CachingProvider::new(MemoryLoader::default().with_source("main.c4", source));
    ///
    /// let workspace = Parser::run("main.c4", &mut provider).unwrap();
    /// assert_eq!(workspace.base.name, "Shop");
    ///
    /// let user = workspace.find(&"user".parse().unwrap()).unwrap();
    /// assert_eq!(user.base().name, "User");
    /// ```
    pub fn run(target: &str, provider: &'p mut dyn Provider) -> Result<Workspace> {
        let mut parser = Self::open(target, provider)?;
        parser.skip_terminators()?;
        let workspace = parser.parse_top_level()?;
        parser.skip_terminators()?;
        parser.expect(TokenKind::Eof)?;
        Ok(workspace)
    }

    /// Parses `target` as one or more workspaces followed by the end of input.
    ///
    /// # Errors
    ///
    /// As [`Parser::run`]. An input without any workspace is an error.
    pub fn run_all(target: &str, provider: &'p mut dyn Provider) -> Result<Vec<Workspace>> {
        let mut parser = Self::open(target, provider)?;
        let mut workspaces = Vec::new();
        loop {
            parser.skip_terminators()?;
            let token = parser.peek()?;
            if token.is(TokenKind::Eof) && !workspaces.is_empty() {
                return Ok(workspaces);
            }
            workspaces.push(parser.parse_top_level()?);
        }
    }

    fn open(target: &str, provider: &'p mut dyn Provider) -> Result<Self> {
        debug!(file = target; "Parsing");
        let stream = provider.token_stream_for(target)?;
        Ok(Self {
            provider,
            stream,
            suspended: Vec::new(),
            current: None,
            previous: None,
            can_backup: false,
            held: Vec::new(),
            group: None,
            unique_id: 0,
            file: target.to_string(),
        })
    }

    // ============================================================
    // Token access
    // ============================================================

    /// Returns the next grammar token.
    ///
    /// Pragmas are handled here and never returned. The EOF of an included
    /// stream resumes the stream that included it, so EOF is only returned
    /// once the entry stream is exhausted.
    fn next_token(&mut self) -> Result<Token> {
        loop {
            let token = self.stream.next_token();
            if let Some(err) = LexError::from_token(&token) {
                return Err(err.into());
            }

            match token.kind() {
                TokenKind::Pragma => self.handle_pragma(&token)?,
                TokenKind::Eof if !self.suspended.is_empty() => self.resume_outer_stream(),
                _ => {
                    trace!(token:% = token; "Consumed token");
                    self.previous = self.current.replace(token.clone());
                    self.can_backup = true;
                    return Ok(token);
                }
            }
        }
    }

    /// Steps back over the token last returned by [`Parser::next_token`].
    ///
    /// # Panics
    ///
    /// Panics if called twice without an intervening `next_token`.
    fn backup_token(&mut self) {
        assert!(self.can_backup, "attempt to double backup tokens");
        self.can_backup = false;
        self.stream.backup_token();
        self.current = self.previous.take();
    }

    fn peek(&mut self) -> Result<Token> {
        let token = self.next_token()?;
        self.backup_token();
        Ok(token)
    }

    fn accept(&mut self, kind: TokenKind) -> Result<bool> {
        let token = self.next_token()?;
        if token.is(kind) {
            return Ok(true);
        }
        self.backup_token();
        Ok(false)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.next_token()?;
        if token.is(kind) {
            return Ok(token);
        }
        Err(self.unexpected(token)?.tokens([kind]).into())
    }

    fn skip_terminators(&mut self) -> Result<()> {
        while self.accept(TokenKind::Terminator)? {}
        Ok(())
    }

    /// Accepts a terminator, or leaves a closing `}` to end the statement.
    fn expect_statement_end(&mut self) -> Result<()> {
        let token = self.next_token()?;
        match token.kind() {
            TokenKind::Terminator => Ok(()),
            TokenKind::EndBlock => {
                self.backup_token();
                Ok(())
            }
            _ => Err(self
                .unexpected(token)?
                .tokens([TokenKind::Terminator, TokenKind::EndBlock])
                .into()),
        }
    }

    /// The source text a token covers.
    fn symbol(&mut self, token: &Token) -> Result<String> {
        let source = self.provider.source_for(token.range().file())?;
        Ok(token.bytes_at(&source).to_string())
    }

    fn keyword_of(&mut self, token: &Token) -> Result<Option<Keyword>> {
        if !token.is(TokenKind::Keyword) {
            return Ok(None);
        }
        Ok(Keyword::lookup(&self.symbol(token)?))
    }

    fn keyword(&mut self, token: &Token) -> Result<Keyword> {
        let text = self.symbol(token)?;
        Keyword::lookup(&text)
            .ok_or_else(|| ParseError::semantic(format!("unknown keyword '{text}'"), token))
    }

    /// Starts an expectation error for `token`.
    fn unexpected(&mut self, token: Token) -> Result<ExpectationError> {
        let keyword = self.keyword_of(&token)?;
        Ok(ExpectationError::new(token, keyword))
    }

    fn identifier(&mut self, token: &Token) -> Result<IdentifierString> {
        let text = self.symbol(token)?;
        identifier_at(&text, token)
    }

    // ============================================================
    // Includes
    // ============================================================

    fn handle_pragma(&mut self, pragma: &Token) -> Result<()> {
        let name = self.symbol(pragma)?;
        if name != INCLUDE_PRAGMA {
            return Err(ParseError::Unsupported {
                construct: format!("pragma {name}"),
                token: pragma.clone(),
            });
        }

        let operand = self.stream.next_token();
        if let Some(err) = LexError::from_token(&operand) {
            return Err(err.into());
        }
        if !operand.is(TokenKind::String) {
            return Err(ParseError::semantic(
                "#include requires a file name string",
                &operand,
            ));
        }
        let target = unquote(&self.symbol(&operand)?);
        self.push_include(target, &operand)
    }

    fn push_include(&mut self, target: String, at: &Token) -> Result<()> {
        let chain: Vec<&str> = self
            .suspended
            .iter()
            .map(|(stream, _)| stream.name())
            .chain(std::iter::once(self.stream.name()))
            .collect();
        if chain.contains(&target.as_str()) {
            let message = format!("include cycle: {} -> {target}", chain.join(" -> "));
            return Err(ParseError::semantic(message, at));
        }

        let included = match self.provider.token_stream_for(&target) {
            Ok(stream) => stream,
            Err(source) => {
                return Err(ParseError::Include {
                    target,
                    token: at.clone(),
                    source,
                });
            }
        };

        debug!(file = target.as_str(), depth = self.suspended.len() + 1; "Pushing include stream");
        let outer = mem::replace(&mut self.stream, included);
        self.suspended.push((outer, self.current.clone()));
        Ok(())
    }

    fn resume_outer_stream(&mut self) {
        if let Some((outer, current)) = self.suspended.pop() {
            debug!(file = self.stream.name(), resumed = outer.name(); "Popping include stream");
            self.stream = outer;
            self.current = current;
        }
    }

    // ============================================================
    // Identifiers and groups
    // ============================================================

    fn hold_identifier(&mut self, id: IdentifierString) {
        self.held.push(id);
    }

    /// # Panics
    ///
    /// Panics if no identifier is held.
    fn claim_held_identifier(&mut self) -> IdentifierString {
        self.held.pop().expect("attempt to claim null identifier")
    }

    /// Gives `entity` the held identifier, or synthesizes one.
    ///
    /// Runs right after the entity's short declaration, so identifiers are
    /// handed out in source order.
    fn assign_identifier(&mut self, entity: &mut impl Identifiable) {
        if let Some(id) = self.held.pop() {
            entity.set_id(id);
            return;
        }

        let kind = entity.kind();
        let fallback = match kind {
            EntityKind::Workspace => Path::new(&self.file)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(&self.file)
                .to_string(),
            _ => entity.base().name.clone(),
        };
        let id = IdentifierString::synthetic(kind.as_str(), self.unique_id, &fallback);
        self.unique_id += 1;
        debug!(id:% = id, kind:% = kind; "Synthesized identifier");
        entity.set_id(id);
    }

    fn assign_group(&self, entity: &mut Entity) {
        if let Some(group) = &self.group {
            entity.set_group(group);
        }
    }

    // ============================================================
    // Strings
    // ============================================================

    /// Parses a single-line string literal.
    fn parse_string(&mut self) -> Result<String> {
        let token = self.expect(TokenKind::String)?;
        let raw = self.symbol(&token)?;
        if raw.contains('\n') {
            return Err(ParseError::semantic(
                "multiline string not allowed in this context",
                &token,
            ));
        }
        Ok(unquote(&raw))
    }

    /// Parses a string literal that may span lines, removing its common
    /// indentation.
    fn parse_multiline_string(&mut self) -> Result<String> {
        let token = self.expect(TokenKind::String)?;
        let raw = self.symbol(&token)?;
        Ok(dedent(&unquote(&raw)))
    }

    /// Parses a run of tag strings.
    ///
    /// Either one string of comma separated tags, or several strings of one
    /// tag each.
    fn parse_tags(&mut self) -> Result<Vec<String>> {
        let mut tags = Vec::new();
        let mut strings = 0;
        let mut comma_separated = false;

        loop {
            let token = self.next_token()?;
            if !token.is(TokenKind::String) {
                self.backup_token();
                break;
            }

            self.backup_token();
            let text = self.parse_string()?;
            let has_comma = text.contains(',');
            if (has_comma && strings > 0) || (!has_comma && comma_separated) {
                return Err(ParseError::semantic(
                    "mixed comma separated and space separated tags are not allowed",
                    &token,
                ));
            }
            comma_separated |= has_comma;
            strings += 1;
            tags.extend(split_tags(&text));
        }

        if strings == 0 {
            let token = self.peek()?;
            return Err(self.unexpected(token)?.tokens([TokenKind::String]).into());
        }
        Ok(tags)
    }

    /// Parses `{ "key" "value" ... }` into an ordered map.
    fn parse_properties(&mut self) -> Result<IndexMap<String, String>> {
        self.expect(TokenKind::StartBlock)?;
        let mut properties = IndexMap::new();

        loop {
            let token = self.next_token()?;
            match token.kind() {
                TokenKind::Terminator => continue,
                TokenKind::EndBlock => return Ok(properties),
                TokenKind::String => {
                    self.backup_token();
                    let key = self.parse_string()?;
                    if properties.contains_key(&key) {
                        return Err(ParseError::semantic(
                            format!("illegal attempt to redefine key {key}"),
                            &token,
                        ));
                    }
                    let value = self.parse_string()?;
                    self.expect_statement_end()?;
                    properties.insert(key, value);
                }
                _ => {
                    return Err(self
                        .unexpected(token)?
                        .tokens([TokenKind::String, TokenKind::EndBlock])
                        .into());
                }
            }
        }
    }

    /// Parses a `name`, `technology` or `url` value and its terminator.
    fn parse_simple_value(
        &mut self,
        keyword: Keyword,
        value: &mut String,
        at: &Token,
    ) -> Result<()> {
        if !value.is_empty() {
            return Err(redeclaration(keyword, at));
        }
        *value = self.parse_string()?;
        self.expect_statement_end()
    }

    /// Fills `slots` from the leading string arguments, in order.
    ///
    /// Stops at the first token that is not a string. Fewer than `must`
    /// filled slots is an error.
    fn parse_short_declaration(&mut self, must: usize, slots: &mut [Slot<'_>]) -> Result<()> {
        let mut parsed = 0;
        for slot in slots.iter_mut() {
            if !self.peek()?.is(TokenKind::String) {
                break;
            }
            match slot {
                Slot::Text(text) => **text = self.parse_string()?,
                Slot::Tags(tags) => tags.extend(self.parse_tags()?),
            }
            parsed += 1;
        }

        if parsed < must {
            let token = self.peek()?;
            return Err(self
                .unexpected(token)?
                .tokens([TokenKind::String])
                .message(" (did not parse enough arguments in short declaration)")
                .into());
        }
        Ok(())
    }

    // ============================================================
    // Workspaces and the model
    // ============================================================

    fn parse_top_level(&mut self) -> Result<Workspace> {
        let token = self.next_token()?;
        if self.keyword_of(&token)? != Some(Keyword::Workspace) {
            return Err(self.unexpected(token)?.keywords([Keyword::Workspace]).into());
        }
        let mut workspace = self.parse_workspace()?;
        workspace.link_parents();
        Ok(workspace)
    }

    /// Parses a workspace after its keyword.
    fn parse_workspace(&mut self) -> Result<Workspace> {
        let mut workspace = Workspace {
            file: self.file.clone(),
            ..Workspace::default()
        };
        self.assign_identifier(&mut workspace);

        let token = self.peek()?;
        if token.is(TokenKind::Keyword) {
            self.next_token()?;
            if self.keyword(&token)? != Keyword::Extends {
                return Err(self.unexpected(token)?.keywords([Keyword::Extends]).into());
            }
            workspace.extends = Some(self.parse_string()?);
        } else {
            let base = &mut workspace.base;
            self.parse_short_declaration(
                0,
                &mut [Slot::Text(&mut base.name), Slot::Text(&mut base.description)],
            )?;
        }

        let token = self.next_token()?;
        match token.kind() {
            TokenKind::Terminator => return Ok(workspace),
            TokenKind::StartBlock => {}
            _ => {
                return Err(self
                    .unexpected(token)?
                    .tokens([TokenKind::Terminator, TokenKind::StartBlock])
                    .into());
            }
        }

        loop {
            let token = self.next_token()?;
            match token.kind() {
                TokenKind::Terminator => continue,
                TokenKind::EndBlock => return Ok(workspace),
                TokenKind::Keyword => {}
                _ => return Err(self.workspace_expectation(token)?),
            }

            match self.keyword(&token)? {
                Keyword::Name => {
                    self.parse_simple_value(Keyword::Name, &mut workspace.base.name, &token)?;
                }
                Keyword::Description => {
                    if !workspace.base.description.is_empty() {
                        return Err(redeclaration(Keyword::Description, &token));
                    }
                    workspace.base.description = self.parse_multiline_string()?;
                    self.expect_statement_end()?;
                }
                Keyword::Properties => {
                    if !workspace.base.properties.is_empty() {
                        return Err(redeclaration(Keyword::Properties, &token));
                    }
                    workspace.base.properties = self.parse_properties()?;
                }
                Keyword::Model => {
                    if workspace.model.is_some() {
                        return Err(ParseError::semantic("invalid redefinition of model", &token));
                    }
                    workspace.model = Some(self.parse_model()?);
                }
                Keyword::Views | Keyword::View => {
                    return Err(ParseError::Unsupported {
                        construct: "views".to_string(),
                        token,
                    });
                }
                _ => return Err(self.workspace_expectation(token)?),
            }
        }
    }

    fn workspace_expectation(&mut self, token: Token) -> Result<ParseError> {
        Ok(self
            .unexpected(token)?
            .tokens([TokenKind::EndBlock])
            .keywords(WORKSPACE_KEYWORDS.iter().copied())
            .into())
    }

    fn parse_model(&mut self) -> Result<Model> {
        self.expect(TokenKind::StartBlock)?;
        let mut model = Model::default();
        self.parse_body(&mut model, MODEL_KEYWORDS)?;
        Ok(model)
    }

    // ============================================================
    // Entity blocks
    // ============================================================

    /// Parses either a `;` or newline, or a `{ ... }` body.
    fn parse_block<E: Identifiable>(&mut self, entity: &mut E, allowed: &[Keyword]) -> Result<()> {
        let token = self.next_token()?;
        match token.kind() {
            TokenKind::Terminator => Ok(()),
            TokenKind::StartBlock => self.parse_body(entity, allowed),
            _ => Err(self
                .unexpected(token)?
                .tokens([TokenKind::Terminator, TokenKind::StartBlock])
                .into()),
        }
    }

    /// Parses the statements of a body after its `{`, and the closing `}`.
    ///
    /// A group is scoped to the block that declares it, so it is cleared
    /// for the body and restored afterwards.
    fn parse_body<E: Identifiable>(&mut self, entity: &mut E, allowed: &[Keyword]) -> Result<()> {
        let group = self.group.take();
        self.parse_entity_base(entity, allowed)?;
        self.group = group;

        let token = self.next_token()?;
        if token.is(TokenKind::EndBlock) {
            return Ok(());
        }
        Err(self.body_expectation(token, entity, allowed)?)
    }

    /// Parses body statements until a token that cannot start one, which is
    /// left in the stream.
    fn parse_entity_base<E: Identifiable>(&mut self, entity: &mut E, allowed: &[Keyword]) -> Result<()> {
        let holds_relationships = entity.as_relationship_holding_mut().is_some();

        loop {
            let token = self.next_token()?;
            match token.kind() {
                TokenKind::Terminator => continue,
                TokenKind::Identifier if holds_relationships => {
                    self.parse_named_statement(entity, allowed, &token)?;
                    continue;
                }
                TokenKind::Relationship if holds_relationships => {
                    let source = identifier_at(THIS, &token)?;
                    self.add_relationship(entity, source)?;
                    continue;
                }
                TokenKind::Keyword => {}
                _ => {
                    self.backup_token();
                    return Ok(());
                }
            }

            let keyword = self.keyword(&token)?;
            let this_relationship = keyword == Keyword::This && holds_relationships;
            if !allowed.contains(&keyword) && !this_relationship {
                return Err(self.body_expectation(token, entity, allowed)?);
            }

            let base = entity.base_mut();
            match keyword {
                Keyword::Description => {
                    if !base.description.is_empty() {
                        return Err(redeclaration(keyword, &token));
                    }
                    base.description = self.parse_multiline_string()?;
                    self.expect_statement_end()?;
                }
                Keyword::Tags => {
                    if !base.tags.is_empty() {
                        return Err(redeclaration(keyword, &token));
                    }
                    base.tags = self.parse_tags()?;
                    self.expect_statement_end()?;
                }
                Keyword::Properties => {
                    if !base.properties.is_empty() {
                        return Err(redeclaration(keyword, &token));
                    }
                    base.properties = self.parse_properties()?;
                }
                Keyword::Perspectives => {
                    if !base.perspectives.is_empty() {
                        return Err(redeclaration(keyword, &token));
                    }
                    base.perspectives = self.parse_properties()?;
                }
                Keyword::Technology => {
                    self.parse_simple_value(keyword, &mut base.technology, &token)?
                }
                Keyword::Url => self.parse_simple_value(keyword, &mut base.url, &token)?,
                Keyword::Name => self.parse_simple_value(keyword, &mut base.name, &token)?,
                Keyword::This => {
                    self.expect(TokenKind::Relationship)?;
                    let source = identifier_at(THIS, &token)?;
                    self.add_relationship(entity, source)?;
                }
                Keyword::Group => match entity.as_child_holding_mut() {
                    Some(holder) => self.parse_group(holder, allowed)?,
                    None => return Err(self.body_expectation(token, entity, allowed)?),
                },
                _ => {
                    let element = Element::from_keyword(keyword);
                    match (element, entity.as_child_holding_mut()) {
                        (Some(element), Some(holder)) => {
                            self.parse_child(holder, element, &token)?
                        }
                        _ => {
                            // allowed keyword without a grammar of its own
                            self.backup_token();
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Parses the rest of a statement that starts with an identifier:
    /// `id -> dest ...` or `id = element ...`.
    fn parse_named_statement<E: Identifiable>(
        &mut self,
        entity: &mut E,
        allowed: &[Keyword],
        name: &Token,
    ) -> Result<()> {
        let id = self.identifier(name)?;
        self.hold_identifier(id);

        let token = self.next_token()?;
        let can_assign = element_keywords(allowed).next().is_some();
        match token.kind() {
            TokenKind::Relationship => {
                let source = self.claim_held_identifier();
                self.add_relationship(entity, source)
            }
            TokenKind::Assignment if can_assign => match entity.as_child_holding_mut() {
                Some(holder) => self.parse_assigned_element(holder, allowed, name),
                None => Err(self.unexpected(token)?.tokens([TokenKind::Relationship]).into()),
            },
            _ => {
                let mut expected = vec![TokenKind::Relationship];
                if can_assign {
                    expected.push(TokenKind::Assignment);
                }
                Err(self.unexpected(token)?.tokens(expected).into())
            }
        }
    }

    /// Parses the element bound by `id =`. The identifier must be held.
    fn parse_assigned_element(
        &mut self,
        holder: &mut dyn ChildHolding,
        allowed: &[Keyword],
        name: &Token,
    ) -> Result<()> {
        let token = self.next_token()?;
        let element = self
            .keyword_of(&token)?
            .filter(|keyword| allowed.contains(keyword))
            .and_then(Element::from_keyword);

        match element {
            Some(element) => self.parse_child(holder, element, name),
            None => Err(self
                .unexpected(token)?
                .keywords(element_keywords(allowed))
                .into()),
        }
    }

    fn add_relationship<E: Identifiable>(
        &mut self,
        entity: &mut E,
        source: IdentifierString,
    ) -> Result<()> {
        let relationship = self.parse_relationship(source)?;
        if let Some(holder) = entity.as_relationship_holding_mut() {
            holder.add_relationship(relationship);
        }
        Ok(())
    }

    /// Parses an element declaration and adds it to `holder`.
    ///
    /// `at` is the token duplicate identifiers are reported at.
    fn parse_child(
        &mut self,
        holder: &mut dyn ChildHolding,
        element: Element,
        at: &Token,
    ) -> Result<()> {
        let mut child = match element {
            Element::Person => Entity::from(self.parse_person()?),
            Element::SoftwareSystem => Entity::from(self.parse_software_system()?),
            Element::Container => Entity::from(self.parse_container()?),
            Element::Component => Entity::from(self.parse_component()?),
        };
        self.assign_group(&mut child);
        holder.add_child(child).map_err(|error| ParseError::Model {
            error,
            token: at.clone(),
        })
    }

    /// Parses `group "name" { ... }` after its keyword.
    ///
    /// Members are the element kinds allowed in the enclosing body, either
    /// bare or bound with `id =`.
    fn parse_group(&mut self, holder: &mut dyn ChildHolding, allowed: &[Keyword]) -> Result<()> {
        let name = self.parse_string()?;
        self.expect(TokenKind::StartBlock)?;
        debug!(group = name.as_str(); "Entering group");
        let outer = self.group.replace(name);

        loop {
            let token = self.next_token()?;
            match token.kind() {
                TokenKind::Terminator => continue,
                TokenKind::EndBlock => break,
                TokenKind::Identifier => {
                    let id = self.identifier(&token)?;
                    self.expect(TokenKind::Assignment)?;
                    self.hold_identifier(id);
                    self.parse_assigned_element(holder, allowed, &token)?;
                }
                TokenKind::Keyword => {
                    let element = self
                        .keyword_of(&token)?
                        .filter(|keyword| allowed.contains(keyword))
                        .and_then(Element::from_keyword);
                    match element {
                        Some(element) => self.parse_child(holder, element, &token)?,
                        None => return Err(self.group_expectation(token, allowed)?),
                    }
                }
                _ => return Err(self.group_expectation(token, allowed)?),
            }
        }

        self.group = outer;
        Ok(())
    }

    fn group_expectation(&mut self, token: Token, allowed: &[Keyword]) -> Result<ParseError> {
        Ok(self
            .unexpected(token)?
            .tokens([TokenKind::EndBlock, TokenKind::Identifier])
            .keywords(element_keywords(allowed))
            .into())
    }

    fn body_expectation<E: Identifiable>(
        &mut self,
        token: Token,
        entity: &mut E,
        allowed: &[Keyword],
    ) -> Result<ParseError> {
        let mut expected = vec![TokenKind::EndBlock];
        if entity.as_relationship_holding_mut().is_some() {
            expected.extend([TokenKind::Identifier, TokenKind::Relationship]);
        }
        Ok(self
            .unexpected(token)?
            .tokens(expected)
            .keywords(allowed.iter().copied())
            .into())
    }

    // ============================================================
    // Elements and relationships
    // ============================================================

    fn parse_person(&mut self) -> Result<Person> {
        let mut person = Person::default();
        let base = &mut person.base;
        self.parse_short_declaration(
            1,
            &mut [
                Slot::Text(&mut base.name),
                Slot::Text(&mut base.description),
                Slot::Tags(&mut base.tags),
            ],
        )?;
        self.assign_identifier(&mut person);
        self.parse_block(&mut person, PERSON_KEYWORDS)?;
        Ok(person)
    }

    fn parse_software_system(&mut self) -> Result<SoftwareSystem> {
        let mut system = SoftwareSystem::default();
        let base = &mut system.base;
        self.parse_short_declaration(
            1,
            &mut [
                Slot::Text(&mut base.name),
                Slot::Text(&mut base.description),
                Slot::Tags(&mut base.tags),
            ],
        )?;
        self.assign_identifier(&mut system);
        self.parse_block(&mut system, SOFTWARE_SYSTEM_KEYWORDS)?;
        Ok(system)
    }

    fn parse_container(&mut self) -> Result<Container> {
        let mut container = Container::default();
        let base = &mut container.base;
        self.parse_short_declaration(
            1,
            &mut [
                Slot::Text(&mut base.name),
                Slot::Text(&mut base.description),
                Slot::Text(&mut base.technology),
                Slot::Tags(&mut base.tags),
            ],
        )?;
        self.assign_identifier(&mut container);
        self.parse_block(&mut container, CONTAINER_KEYWORDS)?;
        Ok(container)
    }

    fn parse_component(&mut self) -> Result<Component> {
        let mut component = Component::default();
        let base = &mut component.base;
        self.parse_short_declaration(
            1,
            &mut [
                Slot::Text(&mut base.name),
                Slot::Text(&mut base.description),
                Slot::Text(&mut base.technology),
                Slot::Tags(&mut base.tags),
            ],
        )?;
        self.assign_identifier(&mut component);
        self.parse_block(&mut component, COMPONENT_KEYWORDS)?;
        Ok(component)
    }

    /// Parses `dest [description] [technology] [tags]` and an optional body
    /// after the `->`.
    fn parse_relationship(&mut self, source: IdentifierString) -> Result<Relationship> {
        let token = self.expect(TokenKind::Identifier)?;
        let destination = self.identifier(&token)?;

        let mut relationship = Relationship::new(source, destination);
        let base = &mut relationship.base;
        self.parse_short_declaration(
            0,
            &mut [
                Slot::Text(&mut base.description),
                Slot::Text(&mut base.technology),
                Slot::Tags(&mut base.tags),
            ],
        )?;
        self.parse_block(&mut relationship, RELATIONSHIP_KEYWORDS)?;
        Ok(relationship)
    }
}

fn identifier_at(text: &str, token: &Token) -> Result<IdentifierString> {
    IdentifierString::new(text).map_err(|error| ParseError::Model {
        error,
        token: token.clone(),
    })
}

fn redeclaration(keyword: Keyword, at: &Token) -> ParseError {
    ParseError::semantic(format!("illegal redeclaration of {keyword} in block"), at)
}
