//! Selector-based construction

use snapselect_core::{Result, SelectOptions};
use snapselect_platform::Document;

use crate::widget::SnapSelect;

/// Widgets created by [`snap_select`]
#[derive(Debug)]
pub enum Instances {
    /// Exactly one control matched
    One(SnapSelect),
    /// Zero or several controls matched, in document order
    Many(Vec<SnapSelect>),
}

impl Instances {
    pub fn into_vec(self) -> Vec<SnapSelect> {
        match self {
            Instances::One(widget) => vec![widget],
            Instances::Many(widgets) => widgets,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Instances::One(_) => 1,
            Instances::Many(widgets) => widgets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Enhance every control matching `selector` with shared `options`
pub fn snap_select(
    doc: &mut dyn Document,
    selector: &str,
    options: &SelectOptions,
) -> Result<Instances> {
    let controls = doc.query_selector_all(selector)?;

    let mut widgets = controls
        .into_iter()
        .map(|control| SnapSelect::new(doc, control, options))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("{} widget(s) created for {:?}", widgets.len(), selector);
    Ok(match widgets.len() {
        1 => Instances::One(widgets.remove(0)),
        _ => Instances::Many(widgets),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapselect_core::SnapSelectError;
    use snapselect_platform_headless::HeadlessDocument;

    #[test]
    fn test_single_match_returns_one() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let control = doc.add_select(body, false);
        doc.set_attribute(control, "id", "pick");

        match snap_select(&mut doc, "#pick", &SelectOptions::new()).unwrap() {
            Instances::One(widget) => assert_eq!(widget.control(), control),
            other => panic!("expected one instance, got {:?}", other),
        }
    }

    #[test]
    fn test_several_matches_in_document_order() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let first = doc.add_select(body, false);
        let second = doc.add_select(body, true);

        let instances = snap_select(&mut doc, "select", &SelectOptions::new()).unwrap();
        assert_eq!(instances.len(), 2);
        let controls: Vec<_> = instances.into_vec().iter().map(SnapSelect::control).collect();
        assert_eq!(controls, vec![first, second]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let mut doc = HeadlessDocument::new();
        let instances = snap_select(&mut doc, ".missing", &SelectOptions::new()).unwrap();
        assert!(instances.is_empty());
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let mut doc = HeadlessDocument::new();
        let err = snap_select(&mut doc, "div > select", &SelectOptions::new()).unwrap_err();
        assert!(matches!(err, SnapSelectError::Platform(_)));
    }

    #[test]
    fn test_non_select_match_is_an_error() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let div = doc.create_element("div");
        doc.append_child(body, div);
        doc.set_attribute(div, "class", "fancy");

        let err = snap_select(&mut doc, ".fancy", &SelectOptions::new()).unwrap_err();
        assert!(matches!(err, SnapSelectError::NotASelectControl(node) if node == div));
    }
}
