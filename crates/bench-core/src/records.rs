use crate::store::Document;

pub const MODULE_DEF: &str = "Module Def";
pub const REPORT: &str = "Report";

pub const SCRIPT_REPORT: &str = "Script Report";

pub fn module_def(module_name: &str, app_name: &str) -> Document {
    Document::new(MODULE_DEF, module_name)
        .with("module_name", module_name)
        .with("app_name", app_name)
}

/// A standard script report owned by `module` over `ref_doctype`.
pub fn script_report(report_name: &str, module: &str, ref_doctype: &str) -> Document {
    Document::new(REPORT, report_name)
        .with("report_name", report_name)
        .with("module", module)
        .with("ref_doctype", ref_doctype)
        .with("report_type", SCRIPT_REPORT)
        .with("is_standard", "Yes")
        .with("add_total_row", true)
        .with("apply_user_permissions", 1)
        .with("disabled", 0)
        .with("docstatus", 0)
        .with("owner", "Administrator")
        .with("query", "")
}
