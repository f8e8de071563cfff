use crate::models::GroupRole;

/// Editable fields of a group profile. Each maps to an edit/visible rule per
/// caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Name,
    GroupType,
    Plan,
    MaxUsers,
    StartAt,
    ExpireAt,
    StockIssueCode,
    SettlementMonth,
    Memo,
}

pub fn can_edit(field: GroupField, role: GroupRole) -> bool {
    use GroupField::*;
    use GroupRole::*;

    match field {
        Name | Plan | MaxUsers | StartAt | ExpireAt | Memo => matches!(role, Staff),
        GroupType | StockIssueCode | SettlementMonth => matches!(role, Staff | Owner),
    }
}

pub fn is_visible(field: GroupField, role: GroupRole) -> bool {
    use GroupField::*;
    use GroupRole::*;

    match field {
        Memo => matches!(role, Staff),
        _ => matches!(role, Staff | Owner | Member),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupRole;

    #[test]
    fn test_staff_edits_everything() {
        for field in [
            GroupField::Name,
            GroupField::GroupType,
            GroupField::Plan,
            GroupField::MaxUsers,
            GroupField::StartAt,
            GroupField::ExpireAt,
            GroupField::StockIssueCode,
            GroupField::SettlementMonth,
            GroupField::Memo,
        ] {
            assert!(can_edit(field, GroupRole::Staff));
        }
    }

    #[test]
    fn test_owner_edits_only_company_fields() {
        assert!(can_edit(GroupField::GroupType, GroupRole::Owner));
        assert!(can_edit(GroupField::StockIssueCode, GroupRole::Owner));
        assert!(can_edit(GroupField::SettlementMonth, GroupRole::Owner));
        assert!(!can_edit(GroupField::Name, GroupRole::Owner));
        assert!(!can_edit(GroupField::Plan, GroupRole::Owner));
        assert!(!can_edit(GroupField::Memo, GroupRole::Owner));
    }

    #[test]
    fn test_member_edits_nothing() {
        assert!(!can_edit(GroupField::GroupType, GroupRole::Member));
        assert!(!can_edit(GroupField::Name, GroupRole::Member));
    }

    #[test]
    fn test_memo_is_staff_only() {
        assert!(is_visible(GroupField::Memo, GroupRole::Staff));
        assert!(!is_visible(GroupField::Memo, GroupRole::Owner));
        assert!(!is_visible(GroupField::Memo, GroupRole::Member));
        assert!(!is_visible(GroupField::Memo, GroupRole::OutGroup));
    }

    #[test]
    fn test_out_group_sees_nothing() {
        assert!(!is_visible(GroupField::Name, GroupRole::OutGroup));
        assert!(!is_visible(GroupField::StockIssueCode, GroupRole::OutGroup));
    }
}
