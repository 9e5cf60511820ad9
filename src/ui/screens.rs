use crate::config::CatalogConfig;
use crate::view::{ActiveFilter, FilterDimension};

/// Two-step picker: first the dimension (or "show all"), then a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterPicker {
    Dimension { selected: usize },
    Value {
        dimension: FilterDimension,
        selected: usize,
    },
}

/// Result of pressing Enter in the picker.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PickerOutcome {
    /// Moved on to the value list.
    Continue(FilterPicker),
    /// Apply this filter (`None` clears it).
    Apply(Option<ActiveFilter>),
}

const SHOW_ALL: &str = "None (show all)";

impl FilterPicker {
    /// Open the picker with the current filter's dimension preselected.
    pub(crate) fn new(current: Option<&ActiveFilter>) -> Self {
        let selected = current
            .and_then(|active| {
                FilterDimension::ALL
                    .iter()
                    .position(|dimension| *dimension == active.dimension)
            })
            .map(|idx| idx + 1)
            .unwrap_or(0);
        FilterPicker::Dimension { selected }
    }

    pub(crate) fn title(&self) -> String {
        match self {
            FilterPicker::Dimension { .. } => "Filter by".to_string(),
            FilterPicker::Value { dimension, .. } => format!("Choose {}", dimension.label()),
        }
    }

    /// Labels for the current step.
    pub(crate) fn options(&self, config: &CatalogConfig) -> Vec<String> {
        match self {
            FilterPicker::Dimension { .. } => std::iter::once(SHOW_ALL.to_string())
                .chain(
                    FilterDimension::ALL
                        .iter()
                        .map(|dimension| dimension.label().to_string()),
                )
                .collect(),
            FilterPicker::Value { dimension, .. } => dimension.options(config).to_vec(),
        }
    }

    pub(crate) fn selected(&self) -> usize {
        match self {
            FilterPicker::Dimension { selected } | FilterPicker::Value { selected, .. } => {
                *selected
            }
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize, config: &CatalogConfig) {
        let len = self.options(config).len();
        if len == 0 {
            return;
        }
        let selected = match self {
            FilterPicker::Dimension { selected } | FilterPicker::Value { selected, .. } => {
                selected
            }
        };
        *selected = (*selected as isize + offset).clamp(0, len as isize - 1) as usize;
    }

    pub(crate) fn confirm(&self, config: &CatalogConfig) -> PickerOutcome {
        match self {
            FilterPicker::Dimension { selected: 0 } => PickerOutcome::Apply(None),
            FilterPicker::Dimension { selected } => {
                let last = FilterDimension::ALL.len() - 1;
                let dimension = FilterDimension::ALL[(*selected - 1).min(last)];
                PickerOutcome::Continue(FilterPicker::Value {
                    dimension,
                    selected: 0,
                })
            }
            FilterPicker::Value {
                dimension,
                selected,
            } => match dimension.options(config).get(*selected) {
                Some(value) => PickerOutcome::Apply(Some(ActiveFilter {
                    dimension: *dimension,
                    value: value.clone(),
                })),
                None => PickerOutcome::Apply(None),
            },
        }
    }

    /// Esc from the value list returns to the dimension list; `None` closes.
    pub(crate) fn back(&self) -> Option<FilterPicker> {
        match self {
            FilterPicker::Dimension { .. } => None,
            FilterPicker::Value { dimension, .. } => {
                let position = FilterDimension::ALL
                    .iter()
                    .position(|candidate| candidate == dimension)
                    .unwrap_or(0);
                Some(FilterPicker::Dimension {
                    selected: position + 1,
                })
            }
        }
    }
}

/// Move a selection inside a grid of `len` cards laid out `columns` wide.
pub(crate) fn move_in_grid(selected: usize, len: usize, columns: usize, offset: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let target = selected as isize + offset;
    if target < 0 || target >= len as isize {
        // Stay put on horizontal overruns; clamp vertical moves to the edge.
        if offset.unsigned_abs() >= columns {
            return target.clamp(0, len as isize - 1) as usize;
        }
        return selected.min(len - 1);
    }
    target as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_all_clears_filter() {
        let config = CatalogConfig::default();
        let picker = FilterPicker::new(None);
        assert_eq!(picker.confirm(&config), PickerOutcome::Apply(None));
    }

    #[test]
    fn picking_a_genre_takes_two_steps() {
        let config = CatalogConfig::default();
        let mut picker = FilterPicker::new(None);
        picker.move_selection(1, &config);
        let next = match picker.confirm(&config) {
            PickerOutcome::Continue(next) => next,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(next.options(&config), config.genres);

        let mut next = next;
        next.move_selection(3, &config);
        assert_eq!(
            next.confirm(&config),
            PickerOutcome::Apply(Some(ActiveFilter::genre(config.genres[3].clone())))
        );
        assert_eq!(next.back(), Some(FilterPicker::Dimension { selected: 1 }));
    }

    #[test]
    fn current_filter_is_preselected() {
        let picker = FilterPicker::new(Some(&ActiveFilter::priority("High")));
        assert_eq!(picker.selected(), 2);
    }

    #[test]
    fn selection_is_clamped() {
        let config = CatalogConfig::default();
        let mut picker = FilterPicker::new(None);
        picker.move_selection(-5, &config);
        assert_eq!(picker.selected(), 0);
        picker.move_selection(50, &config);
        assert_eq!(picker.selected(), 2);
    }

    #[test]
    fn grid_moves_stay_in_bounds() {
        assert_eq!(move_in_grid(0, 5, 2, 1), 1);
        assert_eq!(move_in_grid(1, 5, 2, 2), 3);
        assert_eq!(move_in_grid(3, 5, 2, 2), 4);
        assert_eq!(move_in_grid(4, 5, 2, 1), 4);
        assert_eq!(move_in_grid(0, 5, 2, -1), 0);
        assert_eq!(move_in_grid(1, 5, 2, -2), 0);
        assert_eq!(move_in_grid(0, 0, 2, 1), 0);
    }
}
