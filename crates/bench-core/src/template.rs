//! Boilerplate for generated source stubs.
//!
//! Placeholders are `{year}`, `{app_publisher}` and, for report scripts,
//! `{name}`. Rendering is plain substitution; no other braces are touched.

use chrono::{Datelike, Local};

const PATCH_PY: &str = r#"# -*- coding: utf-8 -*-
# Copyright (c) {year}, {app_publisher} and contributors
# For license information, please see license.txt

from __future__ import unicode_literals

import frappe

def execute():
	pass
"#;

const REPORT_PY: &str = r#"# Copyright (c) {year}, {app_publisher} and contributors
# For license information, please see license.txt

from __future__ import unicode_literals
import frappe

def execute(filters=None):
	columns, data = [], []
	return columns, data
"#;

const REPORT_JS: &str = r#"// Copyright (c) {year}, {app_publisher} and contributors
// For license information, please see license.txt
/* eslint-disable */

frappe.query_reports["{name}"] = {
	"filters": [

	]
}
"#;

/// Values substituted into a stub header.
#[derive(Debug, Clone)]
pub struct StubContext<'a> {
    pub publisher: &'a str,
    pub year: i32,
}

impl<'a> StubContext<'a> {
    /// Context stamped with the current local year.
    pub fn now(publisher: &'a str) -> Self {
        Self {
            publisher,
            year: Local::now().year(),
        }
    }

    fn fill(&self, template: &str) -> String {
        template
            .replace("{year}", &self.year.to_string())
            .replace("{app_publisher}", self.publisher)
    }
}

pub fn patch_py(ctx: &StubContext<'_>) -> String {
    ctx.fill(PATCH_PY)
}

pub fn report_py(ctx: &StubContext<'_>) -> String {
    ctx.fill(REPORT_PY)
}

pub fn report_js(ctx: &StubContext<'_>, report_name: &str) -> String {
    ctx.fill(REPORT_JS).replace("{name}", &report_name.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> StubContext<'static> {
        StubContext {
            publisher: "Acme Corp",
            year: 2019,
        }
    }

    #[test]
    fn patch_header_is_filled() {
        let out = patch_py(&ctx());
        assert!(out.starts_with("# -*- coding: utf-8 -*-\n# Copyright (c) 2019, Acme Corp and contributors\n"));
        assert!(out.contains("def execute():\n\tpass\n"));
        assert!(!out.contains('{'));
    }

    #[test]
    fn report_script_keeps_filter_braces() {
        let out = report_js(&ctx(), "Sales Register");
        assert!(out.contains("// Copyright (c) 2019, Acme Corp and contributors"));
        assert!(out.contains("frappe.query_reports[\"Sales Register\"] = {"));
        assert!(out.contains("\"filters\": ["));
    }

    #[test]
    fn report_py_has_execute() {
        let out = report_py(&ctx());
        assert!(out.contains("def execute(filters=None):"));
        assert!(out.contains("2019, Acme Corp"));
    }

    #[test]
    fn now_uses_current_year() {
        let ctx = StubContext::now("X");
        assert_eq!(ctx.year, Local::now().year());
    }
}
