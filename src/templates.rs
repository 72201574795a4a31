//! Default HTML Templates
//!
//! Plain-HTML implementation of [`DashboardTemplates`]. Hosts with a real
//! templating engine supply their own implementation; this one keeps the demo
//! server and the router tests self-contained.

use crate::control::{
    ComponentTree, DashboardTemplates, RenderMode, TemplateError, TemplateVars,
};
use crate::widgets::{WidgetId, WidgetTypeId};
use std::fmt::Write;

/// Escape text for interpolation into HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Built-in [`DashboardTemplates`] producing plain HTML.
#[derive(Default)]
pub struct HtmlTemplates;

impl HtmlTemplates {
    pub fn new() -> Self {
        Self
    }

    fn flashes_html(vars: &TemplateVars) -> String {
        let mut out = String::new();
        if let Some(serde_json::Value::Array(flashes)) = vars.get("flashes") {
            for flash in flashes {
                let message = flash["message"].as_str().unwrap_or_default();
                let class = flash["class"].as_str().unwrap_or("alert");
                let _ = write!(
                    out,
                    "<div class=\"flash {}\">{}</div>",
                    escape(class),
                    escape(message)
                );
            }
        }
        out
    }

    fn widget_html(tree: &ComponentTree, id: &WidgetId) -> Result<String, TemplateError> {
        let component = tree
            .widget(id)
            .ok_or_else(|| TemplateError::MissingComponent(format!("widget-{id}")))?;
        Ok(format!(
            "<div class=\"widget\" id=\"widget-{}\">{}</div>",
            escape(id.as_str()),
            component.render()
        ))
    }

    fn catalog_html(vars: &TemplateVars, tree: &ComponentTree) -> Result<String, TemplateError> {
        let mut out = String::from("<ul class=\"widget-catalog\">");
        for key in vars.get_str_array("available_widgets") {
            let widget_type = WidgetTypeId::new(key.clone());
            let component = tree
                .catalog_entry(&widget_type)
                .ok_or_else(|| TemplateError::MissingComponent(format!("wa{key}")))?;
            let _ = write!(
                out,
                "<li class=\"catalog-entry\" data-widget-type=\"{}\">{}</li>",
                escape(&key),
                component.render()
            );
        }
        out.push_str("</ul>");
        Ok(out)
    }

    fn unique_id(vars: &TemplateVars) -> Result<String, TemplateError> {
        vars.get_str("unique_id")
            .map(str::to_string)
            .ok_or_else(|| TemplateError::MissingVariable("unique_id".to_string()))
    }
}

impl DashboardTemplates for HtmlTemplates {
    fn prepare_dashboard(&self, vars: &mut TemplateVars) {
        vars.set("title", "Dashboard");
    }

    fn prepare_edit(&self, vars: &mut TemplateVars) {
        vars.set("title", "Edit dashboard");
    }

    fn prepare_single_widget(
        &self,
        vars: &mut TemplateVars,
        _widget_id: &WidgetId,
        signal_driven: bool,
    ) {
        vars.set("update_reason", if signal_driven { "signal" } else { "insert" });
    }

    fn render(
        &self,
        mode: RenderMode,
        vars: &TemplateVars,
        tree: &ComponentTree,
    ) -> Result<String, TemplateError> {
        match mode {
            RenderMode::Dashboard => {
                let mut body = String::new();
                for id in vars.get_str_array("user_widget_ids") {
                    body.push_str(&Self::widget_html(tree, &WidgetId::new(id))?);
                }
                Ok(format!(
                    "<div class=\"dashboard\">{}{}</div>",
                    Self::flashes_html(vars),
                    body
                ))
            }
            RenderMode::EditFull => {
                let unique_id = Self::unique_id(vars)?;
                let mut body = String::new();
                for id in vars.get_str_array("user_widget_ids") {
                    body.push_str(&Self::widget_html(tree, &WidgetId::new(id))?);
                }
                Ok(format!(
                    "<div class=\"dashboard dashboard-edit\" id=\"{}\">{}{}{}</div>",
                    escape(&unique_id),
                    Self::flashes_html(vars),
                    body,
                    Self::catalog_html(vars, tree)?
                ))
            }
            RenderMode::SingleWidget => {
                let unique_id = Self::unique_id(vars)?;
                let updated = vars
                    .get_str("updated_widget_id")
                    .map(WidgetId::from)
                    .ok_or_else(|| {
                        TemplateError::MissingVariable("updated_widget_id".to_string())
                    })?;
                let reason = vars.get_str("update_reason").unwrap_or("signal");
                // The fragment carries the control id so the client can target
                // the right dashboard for in-place replacement.
                Ok(format!(
                    "<div class=\"widget-update\" data-dashboard=\"{}\" data-reason=\"{}\">{}{}{}</div>",
                    escape(&unique_id),
                    escape(reason),
                    Self::flashes_html(vars),
                    Self::widget_html(tree, &updated)?,
                    Self::catalog_html(vars, tree)?
                ))
            }
        }
    }
}
