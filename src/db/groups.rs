//! Vocabulary group CRUD

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{Group, GroupSummary, NewGroup};

use super::parse_timestamp;

pub fn insert_group(conn: &Connection, group: &NewGroup, now: DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO vocabulary_groups (name, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![group.name.trim(), group.user_id, now.to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_group_by_id(conn: &Connection, id: i64) -> Result<Option<Group>> {
    conn.query_row(
        "SELECT id, name, user_id, created_at FROM vocabulary_groups WHERE id = ?1",
        params![id],
        |row| row_to_group(row),
    )
    .optional()
}

/// Groups of a user with word counts, oldest first
pub fn get_groups_for_user(conn: &Connection, user_id: i64) -> Result<Vec<GroupSummary>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT g.id, g.name, g.user_id, g.created_at,
               COUNT(w.id) AS words_count,
               COALESCE(SUM(w.learned), 0) AS learned_words
        FROM vocabulary_groups g
        LEFT JOIN vocabulary_words w ON w.group_id = g.id
        WHERE g.user_id = ?1
        GROUP BY g.id
        ORDER BY g.id ASC
        "#,
    )?;

    let groups = stmt
        .query_map(params![user_id], |row| {
            Ok(GroupSummary {
                group: row_to_group(row)?,
                words_count: row.get(4)?,
                learned_words: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(groups)
}

/// Rename a group, returning the updated row or None if it does not exist
pub fn rename_group(conn: &Connection, id: i64, name: &str) -> Result<Option<Group>> {
    let updated = conn.execute(
        "UPDATE vocabulary_groups SET name = ?1 WHERE id = ?2",
        params![name.trim(), id],
    )?;
    if updated == 0 {
        return Ok(None);
    }
    get_group_by_id(conn, id)
}

/// Delete a group and, through the foreign key cascade, all of its words
pub fn delete_group(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM vocabulary_groups WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

fn row_to_group(row: &rusqlite::Row) -> Result<Group> {
    let created_at_str: String = row.get(3)?;
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        user_id: row.get(2)?,
        created_at: parse_timestamp(3, &created_at_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::words::get_word_by_id;
    use crate::testing::TestEnv;

    #[test]
    fn test_groups_for_user_include_counts() {
        let env = TestEnv::new().unwrap();
        let first = env.seed_group("Animals").unwrap();
        let second = env.seed_group("Empty").unwrap();
        env.seed_word(first, "cat", 5, None).unwrap();
        env.seed_word(first, "dog", 2, None).unwrap();

        let groups = get_groups_for_user(&env.conn, env.user_id).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group.id, first);
        assert_eq!(groups[0].words_count, 2);
        assert_eq!(groups[0].learned_words, 1);
        assert_eq!(groups[1].group.id, second);
        assert_eq!(groups[1].words_count, 0);
        assert_eq!(groups[1].learned_words, 0);

        assert!(get_groups_for_user(&env.conn, 999).unwrap().is_empty());
    }

    #[test]
    fn test_rename_group() {
        let env = TestEnv::new().unwrap();
        let id = env.seed_group("Old").unwrap();

        let renamed = rename_group(&env.conn, id, "  New ").unwrap().unwrap();
        assert_eq!(renamed.name, "New");
        assert!(rename_group(&env.conn, 999, "x").unwrap().is_none());
    }

    #[test]
    fn test_delete_group_cascades_to_words() {
        let env = TestEnv::new().unwrap();
        let id = env.seed_group("Doomed").unwrap();
        let word_id = env.seed_word(id, "bye", 3, None).unwrap();

        assert!(delete_group(&env.conn, id).unwrap());
        assert!(get_group_by_id(&env.conn, id).unwrap().is_none());
        assert!(get_word_by_id(&env.conn, word_id).unwrap().is_none());

        assert!(!delete_group(&env.conn, id).unwrap());
    }
}
