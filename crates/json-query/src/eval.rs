//! Streaming path evaluator.
//!
//! Walks a token stream depth-first, entering only the subtrees the compiled
//! path selects and skipping sibling values without materializing them. When
//! a filter segment matches a materialized element, evaluation of the
//! remaining segments continues on that element in memory.

use json_query_path::{FilterMatcher, PathSegment};
use json_query_scan::{read_value, JsonEvent, JsonScanner, JsonValue, ScanError, ScanToken};

use crate::Predicate;

pub struct PathEvaluator<'a> {
    segments: &'a [PathSegment],
    limit: i64,
    predicate: Option<&'a Predicate>,
    results: Vec<JsonValue>,
}

impl<'a> PathEvaluator<'a> {
    /// `limit <= 0` means unlimited; the predicate, if any, is applied at
    /// leaf materializations after all path-level filters.
    pub fn new(segments: &'a [PathSegment], limit: i64, predicate: Option<&'a Predicate>) -> Self {
        Self {
            segments,
            limit,
            predicate,
            results: Vec::new(),
        }
    }

    /// Drive the scanner through the whole document and collect matches in
    /// document order.
    pub fn run(mut self, scan: &mut JsonScanner) -> Result<Vec<JsonValue>, ScanError> {
        if scan.peek()? == ScanToken::End {
            // an empty document holds no matches
            return Ok(self.results);
        }
        self.step(scan, 0)?;
        Ok(self.results)
    }

    fn limit_reached(&self) -> bool {
        self.limit > 0 && self.results.len() as i64 >= self.limit
    }

    /// Evaluate the value at the scanner's position against segment `idx`.
    /// Always consumes exactly that value.
    fn step(&mut self, scan: &mut JsonScanner, idx: usize) -> Result<(), ScanError> {
        if idx >= self.segments.len() {
            return self.emit(scan);
        }
        match scan.peek()? {
            ScanToken::BeginObject => self.step_object(scan, idx),
            ScanToken::BeginArray => self.step_array(scan, idx),
            ScanToken::End => Ok(()),
            // the path requires structure but the value is primitive
            _ => scan.skip_value(),
        }
    }

    /// Leaf: materialize, test the caller predicate, collect.
    fn emit(&mut self, scan: &mut JsonScanner) -> Result<(), ScanError> {
        let value = read_value(scan)?;
        if self.limit_reached() {
            return Ok(());
        }
        if let Some(predicate) = self.predicate {
            if !predicate(&value) {
                return Ok(());
            }
        }
        self.results.push(value);
        Ok(())
    }

    fn step_object(&mut self, scan: &mut JsonScanner, idx: usize) -> Result<(), ScanError> {
        let segments = self.segments;
        match &segments[idx] {
            PathSegment::Name(name) => {
                scan.next()?; // BeginObject
                loop {
                    match scan.next()? {
                        JsonEvent::Name(key) => {
                            // keep draining siblings after the limit so the
                            // object is consumed to its closing brace
                            if key == *name && !self.limit_reached() {
                                self.step(scan, idx + 1)?;
                            } else {
                                scan.skip_value()?;
                            }
                        }
                        JsonEvent::EndObject | JsonEvent::End => break,
                        _ => return Err(ScanError::Invalid(scan.offset())),
                    }
                }
                Ok(())
            }
            PathSegment::Wildcard => {
                scan.next()?;
                loop {
                    match scan.next()? {
                        JsonEvent::Name(_) => {
                            if self.limit_reached() {
                                scan.skip_value()?;
                            } else {
                                self.step(scan, idx + 1)?;
                            }
                        }
                        JsonEvent::EndObject | JsonEvent::End => break,
                        _ => return Err(ScanError::Invalid(scan.offset())),
                    }
                }
                Ok(())
            }
            // indexes and filters select array elements only
            _ => scan.skip_value(),
        }
    }

    fn step_array(&mut self, scan: &mut JsonScanner, idx: usize) -> Result<(), ScanError> {
        let segments = self.segments;
        match &segments[idx] {
            PathSegment::Index(target) => {
                scan.next()?; // BeginArray
                let mut pos = 0usize;
                loop {
                    match scan.peek()? {
                        ScanToken::EndArray => {
                            scan.next()?;
                            break;
                        }
                        ScanToken::End => break,
                        _ => {
                            if pos == *target && !self.limit_reached() {
                                self.step(scan, idx + 1)?;
                            } else {
                                scan.skip_value()?;
                            }
                            pos += 1;
                        }
                    }
                }
                Ok(())
            }
            PathSegment::Wildcard => {
                scan.next()?;
                loop {
                    match scan.peek()? {
                        ScanToken::EndArray => {
                            scan.next()?;
                            break;
                        }
                        ScanToken::End => break,
                        _ => {
                            if self.limit_reached() {
                                scan.skip_value()?;
                            } else {
                                self.step(scan, idx + 1)?;
                            }
                        }
                    }
                }
                Ok(())
            }
            PathSegment::Filter(filter) => {
                scan.next()?;
                loop {
                    match scan.peek()? {
                        ScanToken::EndArray => {
                            scan.next()?;
                            break;
                        }
                        ScanToken::End => break,
                        ScanToken::BeginObject => {
                            let element = read_value(scan)?;
                            if !self.limit_reached() && FilterMatcher::matches(&element, filter) {
                                self.step_value(&element, idx + 1);
                            }
                        }
                        // non-objects never satisfy a filter
                        _ => scan.skip_value()?,
                    }
                }
                Ok(())
            }
            PathSegment::Name(_) => scan.skip_value(),
        }
    }

    /// Continue evaluation on an already materialized subtree (the element a
    /// filter segment matched).
    fn step_value(&mut self, value: &JsonValue, idx: usize) {
        if self.limit_reached() {
            return;
        }
        if idx >= self.segments.len() {
            if let Some(predicate) = self.predicate {
                if !predicate(value) {
                    return;
                }
            }
            self.results.push(value.clone());
            return;
        }
        let segments = self.segments;
        match (&segments[idx], value) {
            (PathSegment::Name(name), JsonValue::Object(fields)) => {
                if let Some(child) = fields.get(name) {
                    self.step_value(child, idx + 1);
                }
            }
            (PathSegment::Wildcard, JsonValue::Object(fields)) => {
                for child in fields.values() {
                    if self.limit_reached() {
                        break;
                    }
                    self.step_value(child, idx + 1);
                }
            }
            (PathSegment::Wildcard, JsonValue::Array(items)) => {
                for item in items {
                    if self.limit_reached() {
                        break;
                    }
                    self.step_value(item, idx + 1);
                }
            }
            (PathSegment::Index(i), JsonValue::Array(items)) => {
                if let Some(item) = items.get(*i) {
                    self.step_value(item, idx + 1);
                }
            }
            (PathSegment::Filter(filter), JsonValue::Array(items)) => {
                for item in items {
                    if self.limit_reached() {
                        break;
                    }
                    if FilterMatcher::matches(item, filter) {
                        self.step_value(item, idx + 1);
                    }
                }
            }
            _ => {}
        }
    }
}
